//! Conversions from any [`Value`] into primitive Rust types.
//!
//! Every conversion first looks through pointer and interface indirection; a nil input yields
//! [`CoerceError::Nil`].

mod float;
mod int;

pub use float::{to_f32, to_f64};
pub use int::{to_i8, to_i16, to_i32, to_i64, to_u8, to_u16, to_u32, to_u64};

use crate::conv::{CoerceError, Kind, Value, deref_for_reading, is_nil};

/// Numeric payload of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
	Int(i64),
	Uint(u64),
	Float(f64),
}

impl Number {
	pub(crate) fn of(value: &Value) -> Option<Self> {
		Some(match value {
			Value::I8(v) => Self::Int(i64::from(*v)),
			Value::I16(v) => Self::Int(i64::from(*v)),
			Value::I32(v) => Self::Int(i64::from(*v)),
			Value::I64(v) => Self::Int(*v),
			Value::U8(v) => Self::Uint(u64::from(*v)),
			Value::U16(v) => Self::Uint(u64::from(*v)),
			Value::U32(v) => Self::Uint(u64::from(*v)),
			Value::U64(v) => Self::Uint(*v),
			Value::F32(v) => Self::Float(f64::from(*v)),
			Value::F64(v) => Self::Float(*v),
			_ => return None,
		})
	}

	fn is_nonzero(self) -> bool {
		match self {
			Self::Int(v) => v != 0,
			Self::Uint(v) => v != 0,
			Self::Float(v) => v != 0.0,
		}
	}
}

/// Dereference `value`, failing on nil.
pub(crate) fn base(value: &Value) -> Result<&Value, CoerceError> {
	if is_nil(value) {
		return Err(CoerceError::Nil);
	}
	Ok(deref_for_reading(value))
}

/// Text carried by a string or UTF-8 byte value.
pub(crate) fn text_of<'a>(value: &'a Value, target: &'static str) -> Option<Result<&'a str, CoerceError>> {
	match value {
		Value::String(text) => Some(Ok(text.as_str())),
		Value::Bytes(bytes) => Some(std::str::from_utf8(bytes).map_err(|_| CoerceError::Parse {
			target,
			input: String::from_utf8_lossy(bytes).into_owned(),
		})),
		_ => None,
	}
}

/// Convert to `bool`.
///
/// Numbers are `true` when nonzero; text accepts `true`/`t`/`yes`/`1` and `false`/`f`/`no`/`0`
/// in any case.
pub fn to_bool(value: &Value) -> Result<bool, CoerceError> {
	let value = base(value)?;
	if let Value::Bool(flag) = value {
		return Ok(*flag);
	}
	if let Some(number) = Number::of(value) {
		return Ok(number.is_nonzero());
	}
	match text_of(value, "bool") {
		Some(text) => parse_bool(text?),
		None => Err(CoerceError::Parse {
			target: "bool",
			input: Kind::of(value).to_string(),
		}),
	}
}

fn parse_bool(text: &str) -> Result<bool, CoerceError> {
	match text.to_ascii_lowercase().as_str() {
		"true" | "t" | "yes" | "1" => Ok(true),
		"false" | "f" | "no" | "0" => Ok(false),
		_ => Err(CoerceError::Parse {
			target: "bool",
			input: text.to_owned(),
		}),
	}
}

/// Convert to `String`.
///
/// Structs render through their `Describe` capability; other structured values are rejected.
pub fn to_string(value: &Value) -> Result<String, CoerceError> {
	let value = base(value)?;
	match value {
		Value::String(text) => Ok(text.clone()),
		Value::Bytes(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
		Value::Bool(flag) => Ok(flag.to_string()),
		Value::I8(v) => Ok(v.to_string()),
		Value::I16(v) => Ok(v.to_string()),
		Value::I32(v) => Ok(v.to_string()),
		Value::I64(v) => Ok(v.to_string()),
		Value::U8(v) => Ok(v.to_string()),
		Value::U16(v) => Ok(v.to_string()),
		Value::U32(v) => Ok(v.to_string()),
		Value::U64(v) => Ok(v.to_string()),
		Value::F32(v) => Ok(v.to_string()),
		Value::F64(v) => Ok(v.to_string()),
		Value::Struct(item) => match item.ty.capabilities().and_then(|caps| caps.describer()) {
			Some(describer) => Ok(describer.describe(item)),
			None => Err(CoerceError::Unsupported {
				target: "string",
				kind: Kind::Struct,
			}),
		},
		other => Err(CoerceError::Unsupported {
			target: "string",
			kind: Kind::of(other),
		}),
	}
}

/// Convert to raw bytes. Strings, bytes, and sequences of `u8` pass through.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>, CoerceError> {
	let value = base(value)?;
	match value {
		Value::Bytes(bytes) => Ok(bytes.clone()),
		Value::String(text) => Ok(text.as_bytes().to_vec()),
		Value::Seq(seq) => seq
			.items
			.iter()
			.map(|item| match deref_for_reading(item) {
				Value::U8(byte) => Some(*byte),
				_ => None,
			})
			.collect::<Option<Vec<u8>>>()
			.ok_or(CoerceError::Unsupported {
				target: "bytes",
				kind: Kind::Seq,
			}),
		other => Err(CoerceError::Unsupported {
			target: "bytes",
			kind: Kind::of(other),
		}),
	}
}

/// Overwrite the scalar `dst` with `src` converted to its exact width.
///
/// Returns `None` when `dst` is not a bool, number, or string.
pub(crate) fn store(dst: &mut Value, src: &Value) -> Option<Result<(), CoerceError>> {
	let converted = match dst {
		Value::Bool(_) => to_bool(src).map(Value::Bool),
		Value::I8(_) => to_i8(src).map(Value::I8),
		Value::I16(_) => to_i16(src).map(Value::I16),
		Value::I32(_) => to_i32(src).map(Value::I32),
		Value::I64(_) => to_i64(src).map(Value::I64),
		Value::U8(_) => to_u8(src).map(Value::U8),
		Value::U16(_) => to_u16(src).map(Value::U16),
		Value::U32(_) => to_u32(src).map(Value::U32),
		Value::U64(_) => to_u64(src).map(Value::U64),
		Value::F32(_) => to_f32(src).map(Value::F32),
		Value::F64(_) => to_f64(src).map(Value::F64),
		Value::String(_) => to_string(src).map(Value::String),
		_ => return None,
	};
	Some(converted.map(|value| *dst = value))
}

/// Convert a sequence elementwise with `convert`; a lone scalar becomes one element.
fn to_vec<T>(value: &Value, convert: fn(&Value) -> Result<T, CoerceError>, bytes_as_items: bool) -> Result<Vec<T>, CoerceError> {
	if is_nil(value) {
		return Ok(Vec::new());
	}
	let element = |index: usize, source: CoerceError| CoerceError::Element {
		index,
		source: Box::new(source),
	};
	match deref_for_reading(value) {
		Value::Seq(seq) => seq
			.items
			.iter()
			.enumerate()
			.map(|(index, item)| convert(item).map_err(|err| element(index, err)))
			.collect(),
		Value::Bytes(bytes) if bytes_as_items => bytes
			.iter()
			.enumerate()
			.map(|(index, byte)| convert(&Value::U8(*byte)).map_err(|err| element(index, err)))
			.collect(),
		other => Ok(vec![convert(other)?]),
	}
}

/// Convert to `Vec<i64>`.
pub fn to_i64_vec(value: &Value) -> Result<Vec<i64>, CoerceError> {
	to_vec(value, to_i64, true)
}

/// Convert to `Vec<u64>`.
pub fn to_u64_vec(value: &Value) -> Result<Vec<u64>, CoerceError> {
	to_vec(value, to_u64, true)
}

/// Convert to `Vec<f64>`.
pub fn to_f64_vec(value: &Value) -> Result<Vec<f64>, CoerceError> {
	to_vec(value, to_f64, true)
}

/// Convert to `Vec<String>`.
pub fn to_string_vec(value: &Value) -> Result<Vec<String>, CoerceError> {
	to_vec(value, to_string, false)
}
