//! Optional behaviors a struct type can expose to the engine.
//!
//! A type opts in by attaching an [`Capabilities`] implementation to its
//! [`StructType`](crate::conv::StructType) and answering the queries it supports.

use std::sync::Arc;

use crate::conv::{AssignError, BoxError, Result, StructValue};

/// Self-validation run after assignment.
pub trait Validate: Send + Sync {
	/// Check a fully populated instance.
	fn validate(&self, value: &StructValue) -> std::result::Result<(), BoxError>;
}

/// Decoding from text.
pub trait DecodeText: Send + Sync {
	/// Populate `into` from `text`.
	fn decode_text(&self, text: &str, into: &mut StructValue) -> std::result::Result<(), BoxError>;
}

/// Decoding from raw bytes.
pub trait DecodeBinary: Send + Sync {
	/// Populate `into` from `bytes`.
	fn decode_binary(&self, bytes: &[u8], into: &mut StructValue) -> std::result::Result<(), BoxError>;
}

/// Decoding from a serialized JSON document.
pub trait DecodeJson: Send + Sync {
	/// Populate `into` from JSON bytes.
	fn decode_json(&self, json: &[u8], into: &mut StructValue) -> std::result::Result<(), BoxError>;
}

/// Rendering as text, used when the value is coerced to a string.
pub trait Describe: Send + Sync {
	/// Text form of `value`.
	fn describe(&self, value: &StructValue) -> String;
}

/// Capability queries for one struct type.
///
/// Every query defaults to `None`.
pub trait Capabilities: Send + Sync {
	/// Self-validation.
	fn validator(&self) -> Option<&dyn Validate> {
		None
	}

	/// Text decoding.
	fn text_decoder(&self) -> Option<&dyn DecodeText> {
		None
	}

	/// Binary decoding.
	fn binary_decoder(&self) -> Option<&dyn DecodeBinary> {
		None
	}

	/// JSON decoding.
	fn json_decoder(&self) -> Option<&dyn DecodeJson> {
		None
	}

	/// Text rendering.
	fn describer(&self) -> Option<&dyn Describe> {
		None
	}
}

/// Byte-consuming capabilities, tried in the order given to [`decode_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteDecoder {
	Text,
	Binary,
	Json,
}

/// Populate `item` through the first capability in `order` its type exposes.
///
/// Returns `None` when the type exposes none of them.
pub(crate) fn decode_bytes(item: &mut StructValue, bytes: &[u8], order: &[ByteDecoder]) -> Option<Result<()>> {
	let ty = Arc::clone(&item.ty);
	let caps = ty.capabilities()?;
	let failed = |capability: &'static str| {
		let type_name = ty.name.to_string();
		move |source: BoxError| AssignError::Capability {
			capability,
			type_name,
			source,
		}
	};

	for decoder in order {
		let outcome = match decoder {
			ByteDecoder::Text => caps.text_decoder().map(|dec| {
				std::str::from_utf8(bytes)
					.map_err(|err| failed("decode text")(BoxError::from(err)))
					.and_then(|text| dec.decode_text(text, item).map_err(failed("decode text")))
			}),
			ByteDecoder::Binary => caps.binary_decoder().map(|dec| dec.decode_binary(bytes, item).map_err(failed("decode binary"))),
			ByteDecoder::Json => caps.json_decoder().map(|dec| dec.decode_json(bytes, item).map_err(failed("decode json"))),
		};
		if outcome.is_some() {
			return outcome;
		}
	}
	None
}
