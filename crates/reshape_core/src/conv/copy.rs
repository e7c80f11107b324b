use crate::conv::json::decode_into;
use crate::conv::{Result, Value};

/// Copy `src` into `dst` by serializing it to JSON and decoding the document back.
///
/// Works whenever both sides agree on the JSON shape, regardless of their runtime types.
pub fn copy_by_round_trip(dst: &mut Value, src: &Value) -> Result<()> {
	let encoded = serde_json::to_vec(src)?;
	let document: serde_json::Value = serde_json::from_slice(&encoded)?;
	log::trace!("round-trip copy of {} bytes into {}", encoded.len(), dst.type_name());
	decode_into(dst, &document)
}
