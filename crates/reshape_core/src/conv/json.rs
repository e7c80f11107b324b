//! JSON bridge used by the fallback copier, the decoder registry, and the CLI.
//!
//! Serialization renders structs as objects with inline fields flattened and private fields
//! skipped. Decoding into an existing value follows strict JSON typing: numbers must fit the
//! destination width and shapes must line up.

use std::sync::Arc;

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::conv::coerce::{self, store};
use crate::conv::{AssignError, FieldDecl, Kind, Result, StructType, StructValue, Type, Value, deref_for_reading, resolve_writable};

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Self::Null | Self::Interface(None) => serializer.serialize_unit(),
			Self::Bool(v) => serializer.serialize_bool(*v),
			Self::I8(v) => serializer.serialize_i8(*v),
			Self::I16(v) => serializer.serialize_i16(*v),
			Self::I32(v) => serializer.serialize_i32(*v),
			Self::I64(v) => serializer.serialize_i64(*v),
			Self::U8(v) => serializer.serialize_u8(*v),
			Self::U16(v) => serializer.serialize_u16(*v),
			Self::U32(v) => serializer.serialize_u32(*v),
			Self::U64(v) => serializer.serialize_u64(*v),
			Self::F32(v) => serializer.serialize_f32(*v),
			Self::F64(v) => serializer.serialize_f64(*v),
			Self::String(v) => serializer.serialize_str(v),
			Self::Bytes(v) => serializer.collect_seq(v),
			Self::Seq(seq) => serializer.collect_seq(&seq.items),
			Self::Map(map) => {
				let mut out = serializer.serialize_map(Some(map.len()))?;
				for (key, value) in &map.entries {
					let key = coerce::to_string(key).map_err(|err| S::Error::custom(format!("map key: {err}")))?;
					out.serialize_entry(&key, value)?;
				}
				out.end()
			}
			Self::Struct(item) => {
				let mut out = serializer.serialize_map(None)?;
				serialize_fields(item, &mut out)?;
				out.end()
			}
			Self::Ptr(ptr) => match &ptr.target {
				Some(target) => target.serialize(serializer),
				None => serializer.serialize_unit(),
			},
			Self::Interface(Some(inner)) => inner.serialize(serializer),
		}
	}
}

fn serialize_fields<M: SerializeMap>(item: &StructValue, out: &mut M) -> std::result::Result<(), M::Error> {
	for (decl, value) in item.ty.fields.iter().zip(&item.fields) {
		if decl.private {
			continue;
		}
		if decl.inline {
			match deref_for_reading(value) {
				Value::Struct(inner) => {
					serialize_fields(inner, out)?;
					continue;
				}
				Value::Ptr(_) | Value::Interface(None) => continue,
				_ => {}
			}
		}
		out.serialize_entry(&*decl.name, value)?;
	}
	Ok(())
}

impl Value {
	/// Generic conversion of a parsed JSON document.
	///
	/// Objects become `map[string]any`, arrays `[]any`, and nested nulls nil interfaces. A null
	/// document is the untyped nil.
	pub fn from_json(json: &JsonValue) -> Self {
		match json {
			JsonValue::Null => Self::Null,
			other => generic(other),
		}
	}

	/// Render as a `serde_json` tree.
	pub fn to_json(&self) -> Result<JsonValue> {
		Ok(serde_json::to_value(self)?)
	}
}

fn generic(json: &JsonValue) -> Value {
	match json {
		JsonValue::Null => Value::Interface(None),
		JsonValue::Bool(v) => Value::Bool(*v),
		JsonValue::Number(n) => match (n.as_i64(), n.as_u64()) {
			(Some(v), _) => Value::I64(v),
			(None, Some(v)) => Value::U64(v),
			_ => Value::F64(n.as_f64().unwrap_or(f64::NAN)),
		},
		JsonValue::String(v) => Value::String(v.clone()),
		JsonValue::Array(items) => Value::seq(Type::Any, items.iter().map(slot)),
		JsonValue::Object(entries) => Value::map(
			Type::String,
			Type::Any,
			entries.iter().map(|(key, value)| (Value::String(key.clone()), slot(value))),
		),
	}
}

fn slot(json: &JsonValue) -> Value {
	match json {
		JsonValue::Null => Value::Interface(None),
		other => Value::Interface(Some(Box::new(generic(other)))),
	}
}

fn json_kind(json: &JsonValue) -> &'static str {
	match json {
		JsonValue::Null => "null",
		JsonValue::Bool(_) => "bool",
		JsonValue::Number(_) => "number",
		JsonValue::String(_) => "string",
		JsonValue::Array(_) => "array",
		JsonValue::Object(_) => "object",
	}
}

fn shape(dst: &Value, json: &JsonValue) -> AssignError {
	AssignError::JsonShape {
		expected: dst.type_name(),
		found: json_kind(json),
	}
}

/// Decode `json` into the existing value `dst`.
///
/// `null` leaves every destination untouched, pointers included, so a nil source never clears
/// a populated destination.
pub fn decode_into(dst: &mut Value, json: &JsonValue) -> Result<()> {
	if json.is_null() {
		return Ok(());
	}

	match dst {
		Value::Ptr(_) => decode_into(resolve_writable(dst, true), json),
		Value::Interface(Some(inner)) => decode_into(inner, json),
		Value::Interface(None) => {
			*dst = Value::Interface(Some(Box::new(generic(json))));
			Ok(())
		}
		Value::Null => Err(AssignError::UnsupportedKind { kind: Kind::Nil }),
		Value::Bool(v) => {
			*v = json.as_bool().ok_or_else(|| AssignError::JsonShape {
				expected: "bool".to_owned(),
				found: json_kind(json),
			})?;
			Ok(())
		}
		Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_) | Value::U8(_) | Value::U16(_) | Value::U32(_) | Value::U64(_) => {
			decode_integer(dst, json)
		}
		Value::F32(_) | Value::F64(_) => decode_float(dst, json),
		Value::String(v) => match json {
			JsonValue::String(text) => {
				v.clone_from(text);
				Ok(())
			}
			other => Err(AssignError::JsonShape {
				expected: "string".to_owned(),
				found: json_kind(other),
			}),
		},
		Value::Bytes(v) => {
			*v = decode_bytes(json)?;
			Ok(())
		}
		Value::Seq(seq) => {
			let JsonValue::Array(items) = json else {
				return Err(AssignError::JsonShape {
					expected: Type::seq(seq.elem.clone()).to_string(),
					found: json_kind(json),
				});
			};
			let mut decoded = Vec::with_capacity(items.len());
			for (index, item) in items.iter().enumerate() {
				let mut slot = seq.elem.zero();
				decode_into(&mut slot, item).map_err(|err| AssignError::Index {
					index,
					source: Box::new(err),
				})?;
				decoded.push(slot);
			}
			seq.items = decoded;
			Ok(())
		}
		Value::Map(map) => {
			let JsonValue::Object(entries) = json else {
				return Err(AssignError::JsonShape {
					expected: Type::map(map.key.clone(), map.value.clone()).to_string(),
					found: json_kind(json),
				});
			};
			for (key, item) in entries {
				let parsed = parse_key(&map.key, key)?;
				let mut slot = map.value.zero();
				decode_into(&mut slot, item).map_err(|err| err.in_field(key.clone()))?;
				map.insert(parsed, slot);
			}
			Ok(())
		}
		Value::Struct(item) => decode_struct(item, json),
	}
}

fn decode_integer(dst: &mut Value, json: &JsonValue) -> Result<()> {
	let JsonValue::Number(number) = json else {
		return Err(shape(dst, json));
	};
	let target = match dst {
		Value::I8(_) => "i8",
		Value::I16(_) => "i16",
		Value::I32(_) => "i32",
		Value::I64(_) => "i64",
		Value::U8(_) => "u8",
		Value::U16(_) => "u16",
		Value::U32(_) => "u32",
		_ => "u64",
	};
	let wide = match (number.as_i64(), number.as_u64()) {
		(Some(v), _) => i128::from(v),
		(None, Some(v)) => i128::from(v),
		_ => {
			return Err(AssignError::JsonShape {
				expected: target.to_owned(),
				found: "fractional number",
			});
		}
	};
	let range = || AssignError::JsonRange {
		target,
		value: number.to_string(),
	};
	match dst {
		Value::I8(v) => *v = i8::try_from(wide).map_err(|_| range())?,
		Value::I16(v) => *v = i16::try_from(wide).map_err(|_| range())?,
		Value::I32(v) => *v = i32::try_from(wide).map_err(|_| range())?,
		Value::I64(v) => *v = i64::try_from(wide).map_err(|_| range())?,
		Value::U8(v) => *v = u8::try_from(wide).map_err(|_| range())?,
		Value::U16(v) => *v = u16::try_from(wide).map_err(|_| range())?,
		Value::U32(v) => *v = u32::try_from(wide).map_err(|_| range())?,
		Value::U64(v) => *v = u64::try_from(wide).map_err(|_| range())?,
		_ => {}
	}
	Ok(())
}

fn decode_float(dst: &mut Value, json: &JsonValue) -> Result<()> {
	let Some(wide) = json.as_f64() else {
		return Err(shape(dst, json));
	};
	match dst {
		Value::F32(v) => {
			if wide.abs() > f64::from(f32::MAX) {
				return Err(AssignError::JsonRange {
					target: "f32",
					value: wide.to_string(),
				});
			}
			*v = wide as f32;
		}
		Value::F64(v) => *v = wide,
		_ => {}
	}
	Ok(())
}

fn decode_bytes(json: &JsonValue) -> Result<Vec<u8>> {
	match json {
		JsonValue::String(text) => Ok(text.as_bytes().to_vec()),
		JsonValue::Array(items) => items
			.iter()
			.map(|item| {
				item.as_u64().and_then(|v| u8::try_from(v).ok()).ok_or_else(|| AssignError::JsonRange {
					target: "u8",
					value: item.to_string(),
				})
			})
			.collect(),
		other => Err(AssignError::JsonShape {
			expected: "bytes".to_owned(),
			found: json_kind(other),
		}),
	}
}

fn parse_key(key_ty: &Type, text: &str) -> Result<Value> {
	match key_ty {
		Type::String => Ok(Value::String(text.to_owned())),
		Type::Any => Ok(Value::any(text)),
		other => {
			let mut key = other.zero();
			match store(&mut key, &Value::from(text)) {
				Some(Ok(())) => Ok(key),
				Some(Err(source)) => Err(AssignError::Coerce {
					kind: Kind::of(&key),
					source,
				}),
				None => Err(AssignError::JsonShape {
					expected: other.to_string(),
					found: "object key",
				}),
			}
		}
	}
}

fn decode_struct(item: &mut StructValue, json: &JsonValue) -> Result<()> {
	let ty = Arc::clone(&item.ty);
	let type_name = || ty.name.to_string();

	if let Some(decoder) = ty.capabilities().and_then(|caps| caps.json_decoder()) {
		let raw = serde_json::to_vec(json)?;
		return decoder.decode_json(&raw, item).map_err(|source| AssignError::Capability {
			capability: "decode json",
			type_name: type_name(),
			source,
		});
	}

	match json {
		JsonValue::String(text) => match ty.capabilities().and_then(|caps| caps.text_decoder()) {
			Some(decoder) => decoder.decode_text(text, item).map_err(|source| AssignError::Capability {
				capability: "decode text",
				type_name: type_name(),
				source,
			}),
			None => Err(AssignError::JsonShape {
				expected: type_name(),
				found: "string",
			}),
		},
		JsonValue::Object(entries) => {
			for (key, value) in entries {
				decode_key(item, key, value)?;
			}
			Ok(())
		}
		other => Err(AssignError::JsonShape {
			expected: type_name(),
			found: json_kind(other),
		}),
	}
}

/// Public, non-inline field for `key`: exact name first, then ASCII case-insensitive.
fn direct_field(ty: &StructType, key: &str) -> Option<usize> {
	let visible = |decl: &FieldDecl| !decl.private && !decl.inline;
	ty.fields
		.iter()
		.position(|decl| visible(decl) && &*decl.name == key)
		.or_else(|| ty.fields.iter().position(|decl| visible(decl) && decl.name.eq_ignore_ascii_case(key)))
}

/// Whether an inline field of type `ty` exposes a promoted field for `key`.
fn promotes(ty: &Type, key: &str) -> bool {
	match ty {
		Type::Struct(inner) => {
			direct_field(inner, key).is_some()
				|| inner.fields.iter().any(|decl| decl.inline && !decl.private && promotes(&decl.ty, key))
		}
		Type::Ptr(elem) => promotes(elem, key),
		_ => false,
	}
}

/// Decode one object member, returning whether any field claimed it.
fn decode_key(item: &mut StructValue, key: &str, json: &JsonValue) -> Result<bool> {
	let ty = Arc::clone(&item.ty);
	if let Some(idx) = direct_field(&ty, key) {
		decode_into(&mut item.fields[idx], json).map_err(|err| err.in_field(&*ty.fields[idx].name))?;
		return Ok(true);
	}

	for (idx, decl) in ty.fields.iter().enumerate() {
		if !decl.inline || decl.private || !promotes(&decl.ty, key) {
			continue;
		}
		if let Value::Struct(inner) = resolve_writable(&mut item.fields[idx], true) {
			if decode_key(inner, key, json)? {
				return Ok(true);
			}
		}
	}
	Ok(false)
}
