use crate::conv::capability::{ByteDecoder, decode_bytes};
use crate::conv::coerce::store;
use crate::conv::{AssignError, Kind, Result, Type, Value, resolve_writable};

/// Populate `target` from raw bytes.
///
/// Structs go through their text, binary, or JSON decoding capability, in that order. Scalars
/// parse the bytes as UTF-8 text; byte strings and `[]u8` sequences take them verbatim. A nil
/// pointer target is not writable.
pub fn set_bytes(target: &mut Value, bytes: &[u8]) -> Result<()> {
	let target = resolve_writable(target, false);
	match target {
		Value::Ptr(_) | Value::Interface(None) => {
			return Err(AssignError::Unwritable {
				type_name: target.type_name(),
			});
		}
		Value::Interface(Some(inner)) => return set_bytes(inner, bytes),
		Value::Struct(item) => {
			return decode_bytes(item, bytes, &[ByteDecoder::Text, ByteDecoder::Binary, ByteDecoder::Json]).unwrap_or(Err(
				AssignError::ShapeMismatch {
					expected: "decodable struct",
					found: Kind::Bytes,
				},
			));
		}
		Value::Bytes(slot) => {
			*slot = bytes.to_vec();
			return Ok(());
		}
		Value::Seq(seq) if seq.elem == Type::U8 => {
			seq.items = bytes.iter().copied().map(Value::U8).collect();
			return Ok(());
		}
		_ => {}
	}

	let source = Value::Bytes(bytes.to_vec());
	match store(target, &source) {
		Some(stored) => stored.map_err(|source| AssignError::Coerce {
			kind: Kind::of(target),
			source,
		}),
		None => Err(AssignError::UnsupportedKind { kind: Kind::of(target) }),
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::set_bytes;
	use crate::conv::capability::{Capabilities, DecodeBinary, DecodeText};
	use crate::conv::{AssignError, BoxError, StructType, StructValue, Type, Value};

	struct Both;

	impl DecodeText for Both {
		fn decode_text(&self, text: &str, into: &mut StructValue) -> Result<(), BoxError> {
			into.set("Via", format!("text:{text}"))?;
			Ok(())
		}
	}

	impl DecodeBinary for Both {
		fn decode_binary(&self, bytes: &[u8], into: &mut StructValue) -> Result<(), BoxError> {
			into.set("Via", format!("binary:{}", bytes.len()))?;
			Ok(())
		}
	}

	impl Capabilities for Both {
		fn text_decoder(&self) -> Option<&dyn DecodeText> {
			Some(self)
		}

		fn binary_decoder(&self) -> Option<&dyn DecodeBinary> {
			Some(self)
		}
	}

	#[test]
	fn struct_prefers_text_decoding() {
		let ty = StructType::builder("Token").field("Via", Type::String).capabilities(Arc::new(Both)).build();
		let mut value = Type::Struct(ty).zero();
		set_bytes(&mut value, b"abc").expect("decodes");
		assert_eq!(value.get("Via").and_then(Value::as_str), Some("text:abc"));
	}

	#[test]
	fn scalars_parse_text() {
		let mut number = Value::ptr_to(0_u16);
		set_bytes(&mut number, b"513").expect("parses");
		assert_eq!(number, Value::ptr_to(513_u16));

		let mut flag = Value::Bool(false);
		set_bytes(&mut flag, b"yes").expect("parses");
		assert_eq!(flag, Value::Bool(true));

		let mut text = Value::String(String::new());
		set_bytes(&mut text, b"raw").expect("copies");
		assert_eq!(text, Value::from("raw"));

		let err = set_bytes(&mut Value::I8(0), b"999").expect_err("range");
		assert!(matches!(err, AssignError::Coerce { .. }));
	}

	#[test]
	fn nil_pointer_is_not_writable() {
		let mut value = Type::ptr(Type::I32).zero();
		assert!(matches!(set_bytes(&mut value, b"1"), Err(AssignError::Unwritable { .. })));
	}

	#[test]
	fn plain_struct_rejects_bytes() {
		let ty = StructType::builder("Plain").build();
		let mut value = Type::Struct(ty).zero();
		assert!(matches!(set_bytes(&mut value, b"1"), Err(AssignError::ShapeMismatch { .. })));
	}
}
