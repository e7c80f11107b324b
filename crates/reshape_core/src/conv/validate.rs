use crate::conv::{AssignError, FieldPath, Result, Value, deref_for_reading};

/// Run `Validate` capabilities over `value`.
///
/// A struct that validates itself decides for its whole subtree; otherwise public fields are
/// checked in declaration order and the first failure wins.
pub fn validate(value: &Value) -> Result<()> {
	let mut path = FieldPath::default();
	validate_at(value, &mut path)
}

fn validate_at(value: &Value, path: &mut FieldPath) -> Result<()> {
	let Value::Struct(item) = deref_for_reading(value) else {
		return Ok(());
	};

	if let Some(validator) = item.ty.capabilities().and_then(|caps| caps.validator()) {
		return validator.validate(item).map_err(|source| AssignError::Validation {
			path: path.to_string(),
			source,
		});
	}

	for (decl, field) in item.ty.fields.iter().zip(&item.fields) {
		if decl.private {
			continue;
		}
		path.push_field(&*decl.name);
		let outcome = validate_at(field, path);
		path.pop();
		outcome?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::validate;
	use crate::conv::capability::{Capabilities, Validate};
	use crate::conv::{AssignError, BoxError, StructType, StructValue, Type, Value};

	struct NonEmptyName;

	impl Validate for NonEmptyName {
		fn validate(&self, value: &StructValue) -> Result<(), BoxError> {
			match value.field("Name").and_then(Value::as_str) {
				Some("") | None => Err("name is empty".into()),
				Some(_) => Ok(()),
			}
		}
	}

	impl Capabilities for NonEmptyName {
		fn validator(&self) -> Option<&dyn Validate> {
			Some(self)
		}
	}

	fn wrapper(name: &str) -> Value {
		let inner = StructType::builder("Inner").field("Name", Type::String).capabilities(Arc::new(NonEmptyName)).build();
		let outer = StructType::builder("Outer").field("Child", Type::ptr(Type::Struct(inner.clone()))).build();
		let child = StructValue::new(inner).with("Name", name).expect("field exists");
		StructValue::new(outer).with("Child", Value::ptr_to(child)).expect("field exists").into()
	}

	#[test]
	fn no_validator_anywhere_is_success() {
		let plain = StructType::builder("Plain").field("X", Type::I64).build();
		validate(&Type::Struct(plain).zero()).expect("valid");
		validate(&Value::I64(3)).expect("valid");
	}

	#[test]
	fn nested_failure_reports_dotted_path() {
		validate(&wrapper("Ada")).expect("valid");
		match validate(&wrapper("")) {
			Err(AssignError::Validation { path, source }) => {
				assert_eq!(path, "Child");
				assert_eq!(source.to_string(), "name is empty");
			}
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn root_failure_reports_dollar() {
		let inner = StructType::builder("Inner").field("Name", Type::String).capabilities(Arc::new(NonEmptyName)).build();
		match validate(&Type::Struct(inner).zero()) {
			Err(AssignError::Validation { path, .. }) => assert_eq!(path, "$"),
			other => panic!("unexpected {other:?}"),
		}
	}
}
