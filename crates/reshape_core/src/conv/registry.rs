//! Content-type keyed decoders turning request bodies into source values.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::conv::{AssignError, Result, Value};

/// Decoder turning a request body into a source value.
pub type DecodeFn = fn(&[u8]) -> Result<Value>;

/// Content-type keyed decoders, owned by the caller.
#[derive(Debug)]
pub struct DecoderRegistry {
	decoders: RwLock<HashMap<String, DecodeFn>>,
}

/// `application/json`: generic JSON conversion.
pub const JSON: &str = "application/json";
/// `text/plain`: the body as a string.
pub const TEXT: &str = "text/plain";
/// `application/octet-stream`: the body as bytes.
pub const OCTET_STREAM: &str = "application/octet-stream";

impl Default for DecoderRegistry {
	fn default() -> Self {
		let registry = Self::empty();
		registry.register(JSON, decode_json);
		registry.register(TEXT, decode_text);
		registry.register(OCTET_STREAM, decode_octets);
		registry
	}
}

impl DecoderRegistry {
	/// Registry with the JSON, text, and octet-stream decoders.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry without any decoders.
	pub fn empty() -> Self {
		Self {
			decoders: RwLock::new(HashMap::new()),
		}
	}

	/// Install `decoder` for `content_type`, returning the one it replaces.
	pub fn register(&self, content_type: &str, decoder: DecodeFn) -> Option<DecodeFn> {
		let key = normalize(content_type);
		log::debug!("registering decoder for {key}");
		self.decoders.write().unwrap_or_else(PoisonError::into_inner).insert(key, decoder)
	}

	/// Decode `body` with the decoder registered for `content_type`.
	///
	/// Parameters such as `; charset=utf-8` are ignored when looking the decoder up.
	pub fn decode(&self, content_type: &str, body: &[u8]) -> Result<Value> {
		let key = normalize(content_type);
		let decoder = self
			.decoders
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(&key)
			.copied()
			.ok_or(AssignError::UnknownContentType { content_type: key })?;
		decoder(body)
	}

	/// Registered content types in sorted order.
	pub fn content_types(&self) -> Vec<String> {
		let mut types: Vec<String> = self.decoders.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect();
		types.sort();
		types
	}
}

/// Lowercased media type without parameters.
pub fn normalize(content_type: &str) -> String {
	content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

fn decode_json(body: &[u8]) -> Result<Value> {
	let json: serde_json::Value = serde_json::from_slice(body)?;
	Ok(Value::from_json(&json))
}

fn decode_text(body: &[u8]) -> Result<Value> {
	Ok(Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn decode_octets(body: &[u8]) -> Result<Value> {
	Ok(Value::Bytes(body.to_vec()))
}
