//! Structural assignment of one [`Value`] into another.
//!
//! The destination is allocated through nil pointers as the walk descends; the source is only
//! read. Scalars coerce to the destination's exact width, sequences and maps rebuild their
//! items, and structs are filled field by field through a [`NameMatcher`].

mod record;

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, trace, warn};

use crate::conv::coerce::{self, store};
use crate::conv::copy::copy_by_round_trip;
use crate::conv::name::{DefaultMatcher, NameMatcher};
use crate::conv::validate::validate;
use crate::conv::{AssignError, FieldPath, Kind, MapValue, Report, Result, SeqValue, Type, Value, deref_for_reading, resolve_writable, type_of};

/// Behavior switches for [`Assigner`].
#[derive(Debug, Clone)]
pub struct AssignOptions {
	/// Attempt a JSON round-trip copy before the structural pass.
	pub fallback_copy: bool,
	/// Maximum recursion depth of the structural pass.
	pub max_depth: u32,
}

impl Default for AssignOptions {
	fn default() -> Self {
		Self {
			fallback_copy: true,
			max_depth: 64,
		}
	}
}

/// Configured assignment entry point.
#[derive(Clone)]
pub struct Assigner<'m> {
	options: AssignOptions,
	matcher: &'m dyn NameMatcher,
}

impl Assigner<'static> {
	/// Assigner with default options and the [`DefaultMatcher`].
	pub fn new() -> Self {
		Self {
			options: AssignOptions::default(),
			matcher: &DefaultMatcher,
		}
	}
}

impl Default for Assigner<'static> {
	fn default() -> Self {
		Self::new()
	}
}

impl<'m> Assigner<'m> {
	/// Replace the options.
	pub fn with_options(self, options: AssignOptions) -> Self {
		Self { options, ..self }
	}

	/// Replace the name matcher.
	pub fn with_matcher<'n>(self, matcher: &'n dyn NameMatcher) -> Assigner<'n> {
		Assigner {
			options: self.options,
			matcher,
		}
	}

	/// Current options.
	pub fn options(&self) -> &AssignOptions {
		&self.options
	}

	/// Fill `dst` from `src` and validate the result.
	///
	/// Per-field failures are skipped and returned in the [`Report`].
	pub fn assign(&self, dst: &mut Value, src: &Value) -> Result<Report> {
		if dst.is_null() || matches!(deref_for_reading(src), Value::Null | Value::Interface(None)) {
			return Err(AssignError::NilValue);
		}

		if self.options.fallback_copy {
			fallback_copy(dst, src);
		}

		let mut ctx = Context {
			matcher: self.matcher,
			max_depth: self.options.max_depth,
			depth: 0,
			path: FieldPath::default(),
			report: Report::default(),
		};
		ctx.assign_value(dst, src).map_err(|source| AssignError::Assign {
			from: src.type_name(),
			to: dst.type_name(),
			source: Box::new(source),
		})?;

		validate(dst).map_err(|source| AssignError::Invalid {
			from: src.type_name(),
			to: dst.type_name(),
			source: Box::new(source),
		})?;
		Ok(ctx.report)
	}
}

impl std::fmt::Debug for Assigner<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Assigner").field("options", &self.options).finish_non_exhaustive()
	}
}

/// Fill `dst` from `src` with default options and name matching.
pub fn assign(dst: &mut Value, src: &Value) -> Result<Report> {
	Assigner::new().assign(dst, src)
}

/// Fill `dst` from `src`, matching field names with `matcher`.
pub fn assign_with(dst: &mut Value, src: &Value, matcher: &dyn NameMatcher) -> Result<Report> {
	Assigner::new().with_matcher(matcher).assign(dst, src)
}

/// Best-effort round-trip copy; failures and panics are logged and dropped.
fn fallback_copy(dst: &mut Value, src: &Value) {
	match panic::catch_unwind(AssertUnwindSafe(|| copy_by_round_trip(dst, src))) {
		Ok(Ok(())) => debug!("fallback copy into {} succeeded", dst.type_name()),
		Ok(Err(err)) => debug!("fallback copy into {} failed: {err}", dst.type_name()),
		Err(_) => warn!("fallback copy into {} panicked", dst.type_name()),
	}
}

/// State of one structural pass.
pub(crate) struct Context<'a> {
	matcher: &'a dyn NameMatcher,
	max_depth: u32,
	depth: u32,
	path: FieldPath,
	report: Report,
}

impl Context<'_> {
	pub(crate) fn assign_value(&mut self, dst: &mut Value, src: &Value) -> Result<()> {
		if self.depth >= self.max_depth {
			return Err(AssignError::DepthExceeded { max_depth: self.max_depth });
		}
		self.depth += 1;
		let outcome = self.dispatch(dst, src);
		self.depth -= 1;
		outcome
	}

	fn dispatch(&mut self, dst: &mut Value, src: &Value) -> Result<()> {
		let src = deref_for_reading(src);
		let dst = resolve_writable(dst, true);
		trace!("assign {} <- {} at {}", Kind::of(dst), Kind::of(src), self.path);

		if let Some(stored) = store(dst, src) {
			return stored.map_err(|source| AssignError::Coerce { kind: Kind::of(dst), source });
		}

		match dst {
			Value::Bytes(bytes) => {
				*bytes = bytes_from(src)?;
				Ok(())
			}
			Value::Seq(seq) => self.assign_seq(seq, src),
			Value::Map(map) => self.assign_map(map, src),
			Value::Struct(item) => self.assign_struct(item, src),
			Value::Interface(Some(held)) => {
				let mut fresh = type_of(&**held).zero();
				self.assign_value(&mut fresh, src)?;
				**held = fresh;
				Ok(())
			}
			other => Err(AssignError::UnsupportedKind { kind: Kind::of(other) }),
		}
	}

	fn assign_seq(&mut self, seq: &mut SeqValue, src: &Value) -> Result<()> {
		trace!("assign sequence of {} at {}", seq.elem, self.path);
		let items: Cow<'_, [Value]> = match src {
			Value::Seq(from) => Cow::Borrowed(&from.items),
			Value::Bytes(bytes) => Cow::Owned(bytes.iter().copied().map(Value::U8).collect()),
			other => {
				return Err(AssignError::ShapeMismatch {
					expected: "sequence",
					found: Kind::of(other),
				});
			}
		};

		let mut built = Vec::with_capacity(items.len());
		for (index, item) in items.iter().enumerate() {
			let mut slot = seq.elem.zero();
			self.path.push_index(index);
			let outcome = self.assign_value(&mut slot, item);
			self.path.pop();
			outcome.map_err(|err| AssignError::Index {
				index,
				source: Box::new(err),
			})?;
			built.push(slot);
		}
		seq.items = built;
		Ok(())
	}

	fn assign_map(&mut self, map: &mut MapValue, src: &Value) -> Result<()> {
		let Value::Map(from) = src else {
			return Err(AssignError::ShapeMismatch {
				expected: "map",
				found: Kind::of(src),
			});
		};
		trace!("assign map[{}]{} <- map[{}]{}", map.key, map.value, from.key, from.value);

		if !from.key.assignable_to(&map.key) {
			return rescue_key_mismatch(map, src, from);
		}

		let direct = from.value.assignable_to(&map.value);
		for (key, value) in &from.entries {
			let key_slot = fit(&map.key, key);
			if direct {
				map.insert(key_slot, fit(&map.value, value));
				continue;
			}

			let mut slot = map.value.zero();
			self.path.push_field(coerce::to_string(key).unwrap_or_else(|_| key.type_name()));
			let outcome = match self.assign_value(&mut slot, value) {
				Ok(()) => {
					map.insert(key_slot, slot);
					Ok(())
				}
				Err(err) => self.recover(err),
			};
			self.path.pop();
			outcome?;
		}
		Ok(())
	}

	/// Record a recovered failure at the current path; depth overruns still abort.
	pub(crate) fn recover(&mut self, err: AssignError) -> Result<()> {
		if matches!(err.root_cause(), AssignError::DepthExceeded { .. }) {
			return Err(err);
		}
		warn!("skipping {}: {err}", self.path);
		self.report.record(&self.path, &err);
		Ok(())
	}

	/// Run `step` with `name` pushed onto the path, recovering its failure.
	pub(crate) fn field<F>(&mut self, name: &str, step: F) -> Result<()>
	where
		F: FnOnce(&mut Self) -> Result<()>,
	{
		self.path.push_field(name);
		let outcome = step(self).or_else(|err| self.recover(err));
		self.path.pop();
		outcome
	}

	/// Run `step` discarding its failure and any issues it records.
	pub(crate) fn quietly<F>(&mut self, step: F)
	where
		F: FnOnce(&mut Self) -> Result<()>,
	{
		let mark = self.report.issues.len();
		if let Err(err) = step(self) {
			debug!("ignoring secondary assignment failure at {}: {err}", self.path);
		}
		self.report.issues.truncate(mark);
	}

	pub(crate) fn matches(&self, source: &str, field: &str) -> bool {
		self.matcher.matches(source, field)
	}
}

/// Key types differ, so only a serialization round trip can translate the keys.
fn rescue_key_mismatch(map: &mut MapValue, src: &Value, from: &MapValue) -> Result<()> {
	let mut holder = Value::Map(MapValue {
		key: map.key.clone(),
		value: map.value.clone(),
		entries: std::mem::take(&mut map.entries),
	});
	let outcome = copy_by_round_trip(&mut holder, src);
	if let Value::Map(done) = holder {
		map.entries = done.entries;
	}
	outcome.map_err(|source| AssignError::KeyTypeMismatch {
		from: from.key.to_string(),
		to: map.key.to_string(),
		source: Box::new(source),
	})
}

/// Bytes destination: byte strings copy and sequences narrow elementwise to `u8`.
fn bytes_from(src: &Value) -> Result<Vec<u8>> {
	match src {
		Value::Bytes(bytes) => Ok(bytes.clone()),
		Value::Seq(seq) => seq
			.items
			.iter()
			.enumerate()
			.map(|(index, item)| {
				coerce::to_u8(item).map_err(|source| AssignError::Index {
					index,
					source: Box::new(AssignError::Coerce { kind: Kind::Uint, source }),
				})
			})
			.collect(),
		other => Err(AssignError::ShapeMismatch {
			expected: "bytes",
			found: Kind::of(other),
		}),
	}
}

/// Clone `value` for a slot of type `ty`, boxing it when the slot is dynamic.
fn fit(ty: &Type, value: &Value) -> Value {
	match (ty, value) {
		(Type::Any, Value::Interface(_)) => value.clone(),
		(Type::Any, _) => Value::any(value.clone()),
		_ => value.clone(),
	}
}

#[cfg(test)]
mod tests;
