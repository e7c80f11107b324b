use std::sync::Arc;

use log::trace;

use crate::conv::assign::Context;
use crate::conv::capability::{ByteDecoder, decode_bytes};
use crate::conv::{AssignError, Kind, MapValue, Result, StructValue, Type, Value, deref_for_reading, is_nil, is_zero};

impl Context<'_> {
	pub(super) fn assign_struct(&mut self, item: &mut StructValue, src: &Value) -> Result<()> {
		trace!("assign struct {} <- {} at {}", item.ty.name, Kind::of(src), self.path);
		match src {
			Value::Map(map) => self.map_to_struct(item, map, src),
			Value::Struct(from) => self.struct_to_struct(item, from, src),
			Value::String(text) => {
				let ty = Arc::clone(&item.ty);
				match ty.capabilities().and_then(|caps| caps.text_decoder()) {
					Some(decoder) => decoder.decode_text(text, item).map_err(|source| AssignError::Capability {
						capability: "decode text",
						type_name: ty.name.to_string(),
						source,
					}),
					None => Err(AssignError::ShapeMismatch {
						expected: "struct",
						found: Kind::String,
					}),
				}
			}
			Value::Bytes(bytes) => decode_bytes(item, bytes, &[ByteDecoder::Binary, ByteDecoder::Text, ByteDecoder::Json]).unwrap_or(Err(
				AssignError::ShapeMismatch {
					expected: "struct",
					found: Kind::Bytes,
				},
			)),
			// Reading stopped at a nil indirection; there is nothing to copy.
			Value::Ptr(_) | Value::Interface(None) => Ok(()),
			other => Err(AssignError::ShapeMismatch {
				expected: "struct",
				found: Kind::of(other),
			}),
		}
	}

	fn map_to_struct(&mut self, item: &mut StructValue, map: &MapValue, src: &Value) -> Result<()> {
		check_string_keys(map)?;

		let ty = Arc::clone(&item.ty);
		for (decl, slot) in ty.fields.iter().zip(item.fields.iter_mut()) {
			if decl.private {
				continue;
			}
			if decl.inline {
				self.field(&decl.name, |ctx| ctx.assign_value(slot, src))?;
				continue;
			}

			let found = map
				.entries
				.iter()
				.find(|(key, value)| key.as_str().is_some_and(|key| self.matches(key, &decl.name)) && !is_nil(value));
			if let Some((_, value)) = found {
				self.field(&decl.name, |ctx| ctx.assign_value(slot, value))?;
			}
		}
		Ok(())
	}

	fn struct_to_struct(&mut self, item: &mut StructValue, from: &StructValue, src: &Value) -> Result<()> {
		let ty = Arc::clone(&item.ty);
		for (decl, slot) in ty.fields.iter().zip(item.fields.iter_mut()) {
			if decl.private {
				continue;
			}
			if decl.inline {
				// A matching embedded source member fills its counterpart; otherwise promotion
				// reads from the whole source.
				let embedded = from
					.ty
					.fields
					.iter()
					.zip(&from.fields)
					.find(|(source, value)| source.inline && !source.private && !is_nil(value) && self.matches(&source.name, &decl.name));
				let value = embedded.map_or(src, |(_, value)| value);
				self.field(&decl.name, |ctx| ctx.assign_value(slot, value))?;
				continue;
			}

			let found = from
				.ty
				.fields
				.iter()
				.zip(&from.fields)
				.find(|(source, value)| !source.private && !source.inline && !is_nil(value) && self.matches(&source.name, &decl.name));
			if let Some((_, value)) = found {
				self.field(&decl.name, |ctx| ctx.assign_value(slot, value))?;
			}
		}

		// Embedded source members fill whatever the primary pass left empty.
		for (source, value) in from.ty.fields.iter().zip(&from.fields) {
			if source.private || !source.inline || is_nil(value) || is_zero(deref_for_reading(value)) {
				continue;
			}
			let mut scratch = Value::Struct(StructValue::new(Arc::clone(&ty)));
			self.quietly(|ctx| ctx.assign_value(&mut scratch, value));
			let Value::Struct(filled) = scratch else {
				continue;
			};
			for ((decl, slot), candidate) in ty.fields.iter().zip(item.fields.iter_mut()).zip(filled.fields) {
				if !decl.private && is_zero(slot) && !is_zero(&candidate) {
					*slot = candidate;
				}
			}
		}
		Ok(())
	}
}

/// Struct destinations only accept maps keyed by text.
fn check_string_keys(map: &MapValue) -> Result<()> {
	match &map.key {
		Type::String => Ok(()),
		Type::Any => match map.entries.iter().find(|(key, _)| key.as_str().is_none()) {
			Some((key, _)) => Err(AssignError::NonStringKeys {
				key: deref_for_reading(key).type_name(),
			}),
			None => Ok(()),
		},
		other => Err(AssignError::NonStringKeys { key: other.to_string() }),
	}
}
