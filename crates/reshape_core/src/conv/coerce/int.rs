use std::num::IntErrorKind;

use crate::conv::coerce::{Number, base, text_of};
use crate::conv::{CoerceError, Kind, Value};

/// Outcome of parsing integer text.
enum IntText {
	Value(i128),
	Syntax,
	Range,
}

/// Parse an optional sign and decimal, `0x`, `0o`, or `0b` digits.
fn parse_int_text(text: &str) -> IntText {
	let (negative, unsigned) = match text.as_bytes().first() {
		Some(b'-') => (true, &text[1..]),
		Some(b'+') => (false, &text[1..]),
		_ => (false, text),
	};

	let (radix, digits) = match unsigned.get(..2) {
		Some("0x" | "0X") => (16, &unsigned[2..]),
		Some("0o" | "0O") => (8, &unsigned[2..]),
		Some("0b" | "0B") => (2, &unsigned[2..]),
		_ => (10, unsigned),
	};
	if digits.starts_with(['+', '-']) {
		return IntText::Syntax;
	}

	match u64::from_str_radix(digits, radix) {
		Ok(magnitude) => {
			let magnitude = i128::from(magnitude);
			IntText::Value(if negative { -magnitude } else { magnitude })
		}
		Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow) => IntText::Range,
		Err(_) => IntText::Syntax,
	}
}

fn range(target: &'static str, value: impl ToString) -> CoerceError {
	CoerceError::Range {
		target,
		value: value.to_string(),
	}
}

/// Truncate a float toward zero, failing when it does not fit `[min, max]`.
///
/// Unsigned targets reject every negative input, including fractions that truncate to zero.
fn truncate(value: f64, min: i128, max: i128, target: &'static str) -> Result<i128, CoerceError> {
	if !value.is_finite() || (min == 0 && value < 0.0) {
		return Err(range(target, value));
	}
	let truncated = value.trunc();
	if truncated < min as f64 || truncated > max as f64 {
		return Err(range(target, value));
	}
	// `as` saturates at the i128 bounds, which lie far outside min/max.
	let wide = truncated as i128;
	if wide < min || wide > max {
		return Err(range(target, value));
	}
	Ok(wide)
}

/// Shared integer conversion into `[min, max]`.
fn to_integer(value: &Value, min: i128, max: i128, target: &'static str) -> Result<i128, CoerceError> {
	let value = base(value)?;
	let checked = |n: i128| if n < min || n > max { Err(range(target, n)) } else { Ok(n) };

	if let Some(number) = Number::of(value) {
		return match number {
			Number::Int(n) => checked(i128::from(n)),
			Number::Uint(n) => checked(i128::from(n)),
			Number::Float(f) => truncate(f, min, max, target),
		};
	}

	match value {
		Value::Bool(flag) => Ok(i128::from(*flag)),
		Value::String(_) | Value::Bytes(_) => {
			let text = text_of(value, target).unwrap_or(Err(CoerceError::Nil))?.trim();
			match parse_int_text(text) {
				IntText::Value(n) => checked(n),
				IntText::Range => Err(range(target, text)),
				IntText::Syntax => match text.parse::<f64>() {
					Ok(f) => truncate(f, min, max, target),
					Err(_) => Err(CoerceError::Parse {
						target,
						input: text.to_owned(),
					}),
				},
			}
		}
		other => Err(CoerceError::Unsupported {
			target,
			kind: Kind::of(other),
		}),
	}
}

macro_rules! int_conversions {
	($($(#[$doc:meta])* $name:ident => $ty:ty),* $(,)?) => {
		$(
			$(#[$doc])*
			pub fn $name(value: &Value) -> Result<$ty, CoerceError> {
				let n = to_integer(value, i128::from(<$ty>::MIN), i128::from(<$ty>::MAX), stringify!($ty))?;
				<$ty>::try_from(n).map_err(|_| range(stringify!($ty), n))
			}
		)*
	};
}

int_conversions!(
	/// Convert to `i8`, failing outside its range.
	to_i8 => i8,
	/// Convert to `i16`, failing outside its range.
	to_i16 => i16,
	/// Convert to `i32`, failing outside its range.
	to_i32 => i32,
	/// Convert to `i64`.
	///
	/// Floats truncate toward zero; text falls back to float syntax when integer syntax fails.
	to_i64 => i64,
	/// Convert to `u8`, failing on negatives and outside its range.
	to_u8 => u8,
	/// Convert to `u16`, failing on negatives and outside its range.
	to_u16 => u16,
	/// Convert to `u32`, failing on negatives and outside its range.
	to_u32 => u32,
	/// Convert to `u64`, failing on negative input.
	to_u64 => u64,
);
