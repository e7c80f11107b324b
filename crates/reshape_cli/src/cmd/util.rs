use std::path::Path;

use reshape::conv::registry;
use serde::Serialize;

/// Print `payload` as pretty JSON on stdout.
pub fn emit_json<T: Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Content type implied by a source file's extension.
pub fn content_type_for(path: &Path) -> &'static str {
	match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
		Some("json") => registry::JSON,
		Some("txt" | "text") => registry::TEXT,
		_ => registry::OCTET_STREAM,
	}
}
