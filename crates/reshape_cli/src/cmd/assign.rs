use std::path::PathBuf;

use reshape::conv::{AssignError, AssignOptions, Assigner, DecoderRegistry, DefaultMatcher, ExactMatcher, FieldPath, NameMatcher, Report, Result, Schema, Value};

use crate::cmd::util::{content_type_for, emit_json};

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum MatcherArg {
	/// Word-normalized, case-insensitive names.
	Default,
	/// Case-sensitive equality.
	Exact,
}

#[derive(clap::Args)]
pub struct Args {
	/// Schema document declaring the destination types.
	pub schema: PathBuf,
	/// Source document.
	pub source: PathBuf,
	/// Source content type; defaults from the file extension.
	#[arg(long = "content-type")]
	pub content_type: Option<String>,
	#[arg(long, value_enum, default_value_t = MatcherArg::Default)]
	pub matcher: MatcherArg,
	/// Skip the serialization round-trip copy.
	#[arg(long = "no-fallback")]
	pub no_fallback: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	/// Print only the value at this field path.
	#[arg(long = "get")]
	pub get: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Decode the source, assign it into the schema root, and print the result.
pub fn run(args: Args) -> Result<()> {
	let Args {
		schema: schema_path,
		source,
		content_type,
		matcher,
		no_fallback,
		max_depth,
		get,
		json,
	} = args;

	let schema = Schema::from_path(&schema_path)?;
	let body = std::fs::read(&source)?;
	let content_type = content_type.unwrap_or_else(|| content_type_for(&source).to_owned());
	let src = DecoderRegistry::new().decode(&content_type, &body)?;

	let mut options = AssignOptions {
		fallback_copy: !no_fallback,
		..AssignOptions::default()
	};
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}
	let matcher: &dyn NameMatcher = match matcher {
		MatcherArg::Default => &DefaultMatcher,
		MatcherArg::Exact => &ExactMatcher,
	};

	let mut dst = schema.root_value();
	let report = Assigner::new().with_options(options).with_matcher(matcher).assign(&mut dst, &src)?;

	let value = match get {
		Some(raw) => select(&dst, &raw)?,
		None => dst,
	};
	let rendered = value.to_json()?;

	if json {
		emit_json(&AssignJson {
			value: rendered,
			issues: &report,
		});
		return Ok(());
	}

	for issue in &report.issues {
		eprintln!("warning: {}: {}", issue.path, issue.message);
	}
	emit_json(&rendered);
	Ok(())
}

fn select(root: &Value, raw: &str) -> Result<Value> {
	let path = FieldPath::parse(raw)?;
	path.lookup(root).cloned().ok_or_else(|| AssignError::PathNotFound { path: path.to_string() })
}

#[derive(serde::Serialize)]
struct AssignJson<'a> {
	value: serde_json::Value,
	#[serde(flatten)]
	issues: &'a Report,
}

#[cfg(test)]
mod tests {
	use reshape::conv::{AssignError, Value};

	use super::select;

	#[test]
	fn select_reports_missing_paths() {
		let value = Value::map(reshape::conv::Type::String, reshape::conv::Type::I64, [(Value::from("a"), Value::I64(1))]);
		assert_eq!(select(&value, "a").expect("present"), Value::I64(1));
		assert!(matches!(select(&value, "b"), Err(AssignError::PathNotFound { path }) if path == "b"));
		assert!(matches!(select(&value, "a..b"), Err(AssignError::InvalidFieldPath { .. })));
	}
}
