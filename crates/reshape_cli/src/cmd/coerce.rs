use reshape::conv::schema::parse_type;
use reshape::conv::{Result, Value, assign};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// Literal text; with `--json` it is parsed as a JSON document first.
	pub input: String,
	/// Target type expression such as `u8`, `[]f64`, or `map[string]bool`.
	#[arg(long)]
	pub to: String,
	#[arg(long)]
	pub json: bool,
}

/// Convert one input into the zero value of a built-in type.
pub fn run(args: Args) -> Result<()> {
	let ty = parse_type(&args.to)?;
	let src = if args.json {
		Value::from_json(&serde_json::from_str(&args.input)?)
	} else {
		Value::String(args.input)
	};

	let mut dst = ty.zero();
	let report = assign(&mut dst, &src)?;
	for issue in &report.issues {
		eprintln!("warning: {}: {}", issue.path, issue.message);
	}

	emit_json(&dst.to_json()?);
	Ok(())
}
