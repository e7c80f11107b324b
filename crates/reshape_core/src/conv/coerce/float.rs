use crate::conv::coerce::{Number, base, text_of};
use crate::conv::{CoerceError, Kind, Value};

/// Convert to `f64`.
///
/// Every numeric kind widens; text uses standard float syntax and rejects literals that
/// overflow to infinity.
pub fn to_f64(value: &Value) -> Result<f64, CoerceError> {
	to_float(value, "f64")
}

/// Convert to `f32`, failing when the magnitude exceeds `f32::MAX`.
pub fn to_f32(value: &Value) -> Result<f32, CoerceError> {
	let wide = to_float(value, "f32")?;
	if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
		return Err(CoerceError::Range {
			target: "f32",
			value: wide.to_string(),
		});
	}
	Ok(wide as f32)
}

fn to_float(value: &Value, target: &'static str) -> Result<f64, CoerceError> {
	let value = base(value)?;
	if let Some(number) = Number::of(value) {
		return Ok(match number {
			Number::Int(n) => n as f64,
			Number::Uint(n) => n as f64,
			Number::Float(f) => f,
		});
	}

	match value {
		Value::Bool(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
		Value::String(_) | Value::Bytes(_) => {
			let text = text_of(value, target).unwrap_or(Err(CoerceError::Nil))?;
			parse_float(text.trim(), target)
		}
		other => Err(CoerceError::Unsupported {
			target,
			kind: Kind::of(other),
		}),
	}
}

fn parse_float(text: &str, target: &'static str) -> Result<f64, CoerceError> {
	let parsed = text.parse::<f64>().map_err(|_| CoerceError::Parse {
		target,
		input: text.to_owned(),
	})?;
	// Only literal spellings of infinity may produce an infinite result.
	if parsed.is_infinite() && !is_infinity_literal(text) {
		return Err(CoerceError::Range {
			target,
			value: text.to_owned(),
		});
	}
	Ok(parsed)
}

fn is_infinity_literal(text: &str) -> bool {
	let unsigned = text.trim_start_matches(['+', '-']);
	unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
