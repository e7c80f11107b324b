use std::fmt;

use crate::conv::{AssignError, Result, Value, deref_for_reading};

/// One parsed operation in a field path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Select a struct field or a string map key.
	Field(String),
	/// Select a sequence element by zero-based index.
	Index(usize),
}

/// Parsed field path expression such as `Name.First` or `Tags[2]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
	/// Ordered sequence of path steps.
	pub steps: Vec<PathStep>,
}

impl FieldPath {
	/// Parse dotted field syntax with optional `[index]` selectors.
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = || AssignError::InvalidFieldPath { path: input.to_owned() };
		if input.is_empty() {
			return Err(invalid());
		}

		let bytes = input.as_bytes();
		let mut idx = 0_usize;
		let mut steps = Vec::new();

		while idx < bytes.len() {
			let start = idx;
			while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || matches!(bytes[idx], b'_' | b'-')) {
				idx += 1;
			}
			if idx == start {
				return Err(invalid());
			}
			steps.push(PathStep::Field(input[start..idx].to_owned()));

			while idx < bytes.len() && bytes[idx] == b'[' {
				idx += 1;
				let n_start = idx;
				while idx < bytes.len() && bytes[idx].is_ascii_digit() {
					idx += 1;
				}
				if idx == n_start || idx >= bytes.len() || bytes[idx] != b']' {
					return Err(invalid());
				}
				let number = input[n_start..idx].parse::<usize>().map_err(|_| invalid())?;
				steps.push(PathStep::Index(number));
				idx += 1;
			}

			if idx < bytes.len() {
				if bytes[idx] != b'.' {
					return Err(invalid());
				}
				idx += 1;
				if idx >= bytes.len() {
					return Err(invalid());
				}
			}
		}

		Ok(Self { steps })
	}

	/// Append a field step.
	pub fn push_field(&mut self, name: impl Into<String>) {
		self.steps.push(PathStep::Field(name.into()));
	}

	/// Append an index step.
	pub fn push_index(&mut self, index: usize) {
		self.steps.push(PathStep::Index(index));
	}

	/// Drop the last step.
	pub fn pop(&mut self) {
		self.steps.pop();
	}

	/// Follow the path from `root` through struct fields, string map keys, and sequence items.
	pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
		let mut current = root;
		for step in &self.steps {
			current = match (deref_for_reading(current), step) {
				(Value::Struct(item), PathStep::Field(name)) => item.field(name)?,
				(Value::Map(map), PathStep::Field(name)) => map.get_str(name)?,
				(Value::Seq(seq), PathStep::Index(index)) => seq.items.get(*index)?,
				_ => return None,
			};
		}
		Some(current)
	}
}

impl fmt::Display for FieldPath {
	/// Renders `$` for the root and dotted steps otherwise.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.steps.is_empty() {
			return f.write_str("$");
		}
		for (idx, step) in self.steps.iter().enumerate() {
			match step {
				PathStep::Field(name) if idx == 0 => f.write_str(name)?,
				PathStep::Field(name) => write!(f, ".{name}")?,
				PathStep::Index(index) => write!(f, "[{index}]")?,
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::{FieldPath, PathStep};
	use crate::conv::{StructType, StructValue, Type, Value};

	#[test]
	fn parses_fields_and_indices() {
		let path = FieldPath::parse("Tags[2].Name").expect("path parses");
		assert_eq!(
			path.steps,
			vec![PathStep::Field("Tags".into()), PathStep::Index(2), PathStep::Field("Name".into())]
		);
		assert_eq!(path.to_string(), "Tags[2].Name");
	}

	#[test]
	fn rejects_malformed_paths() {
		for input in ["", "a.", ".a", "a[", "a[x]", "a..b", "a b"] {
			assert!(FieldPath::parse(input).is_err(), "{input}");
		}
	}

	#[test]
	fn root_renders_as_dollar() {
		assert_eq!(FieldPath::default().to_string(), "$");
	}

	#[test]
	fn lookup_walks_structs_maps_and_sequences() {
		let inner = StructType::builder("Inner").field("City", Type::String).build();
		let outer = StructType::builder("Outer").field("Homes", Type::seq(Type::Struct(inner.clone()))).build();
		let home = StructValue::new(inner).with("City", "Toronto").expect("field exists");
		let value: Value = StructValue::new(outer)
			.with("Homes", Value::seq(Type::Any, [Value::ptr_to(home)]))
			.expect("field exists")
			.into();

		let found = FieldPath::parse("Homes[0].City").expect("path parses").lookup(&value);
		assert_eq!(found.and_then(Value::as_str), Some("Toronto"));

		let map = Value::map(Type::String, Type::Any, [(Value::from("k"), Value::any(1_i64))]);
		let found = FieldPath::parse("k").expect("path parses").lookup(&map);
		assert_eq!(found, Some(&Value::any(1_i64)));
		assert!(FieldPath::parse("Homes[3]").expect("path parses").lookup(&value).is_none());
	}
}
