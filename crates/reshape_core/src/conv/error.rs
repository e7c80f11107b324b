use thiserror::Error;

use crate::conv::Kind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, AssignError>;

/// Boxed error returned by user-supplied capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of the scalar coercion functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
	/// Input was nil or dereferenced to a nil indirection.
	#[error("value is nil")]
	Nil,
	/// Text input was not valid syntax for the target.
	#[error("cannot parse {input:?} as {target}")]
	Parse {
		/// Target scalar name.
		target: &'static str,
		/// Offending input rendered as text.
		input: String,
	},
	/// Numeric input is outside the target's width or signedness.
	#[error("{value} is out of range for {target}")]
	Range {
		/// Target scalar name.
		target: &'static str,
		/// Offending value rendered as text.
		value: String,
	},
	/// Input kind has no conversion to the target.
	#[error("cannot convert {kind} to {target}")]
	Unsupported {
		/// Target scalar name.
		target: &'static str,
		/// Classified input kind.
		kind: Kind,
	},
	/// A sequence element failed to convert.
	#[error("convert index {index}: {source}")]
	Element {
		/// Zero-based element index.
		index: usize,
		/// Element failure.
		#[source]
		source: Box<CoerceError>,
	},
}

/// Errors produced while assigning, copying, validating, and decoding values.
#[derive(Debug, Error)]
pub enum AssignError {
	/// Destination or source was nil.
	#[error("value is nil")]
	NilValue,
	/// Destination never reached a settable location.
	#[error("destination is not writable: {type_name}")]
	Unwritable {
		/// Type of the unresolved destination.
		type_name: String,
	},
	/// Scalar coercion failed for the destination kind.
	#[error("parse {kind}: {source}")]
	Coerce {
		/// Destination kind being populated.
		kind: Kind,
		/// Underlying coercion failure.
		#[source]
		source: CoerceError,
	},
	/// Source and destination shapes are fundamentally incompatible.
	#[error("cannot assign {found} to {expected}")]
	ShapeMismatch {
		/// Destination shape.
		expected: &'static str,
		/// Classified source kind.
		found: Kind,
	},
	/// Destination kind has no assignment policy.
	#[error("unsupported destination kind {kind}")]
	UnsupportedKind {
		/// Classified destination kind.
		kind: Kind,
	},
	/// Struct destination received a map whose keys are not strings.
	#[error("source keys are {key} instead of string")]
	NonStringKeys {
		/// Source key type.
		key: String,
	},
	/// Map key types differ and the round-trip rescue failed.
	#[error("cannot assign key {from} to {to}: {source}")]
	KeyTypeMismatch {
		/// Source key type.
		from: String,
		/// Destination key type.
		to: String,
		/// Round-trip failure.
		#[source]
		source: Box<AssignError>,
	},
	/// Sequence element assignment failed.
	#[error("cannot assign [{index}]: {source}")]
	Index {
		/// Zero-based element index.
		index: usize,
		/// Element failure.
		#[source]
		source: Box<AssignError>,
	},
	/// Named field failed while decoding or validating.
	#[error("{name}: {source}")]
	Field {
		/// Field name.
		name: String,
		/// Field failure.
		#[source]
		source: Box<AssignError>,
	},
	/// The structural pass failed at the top level.
	#[error("cannot assign {from} to {to}: {source}")]
	Assign {
		/// Source type.
		from: String,
		/// Destination type.
		to: String,
		/// Structural failure.
		#[source]
		source: Box<AssignError>,
	},
	/// Post-assignment validation failed.
	#[error("cannot validate {to} assigned from {from}: {source}")]
	Invalid {
		/// Source type.
		from: String,
		/// Destination type.
		to: String,
		/// Validation failure.
		#[source]
		source: Box<AssignError>,
	},
	/// A `Validate` capability rejected a value.
	#[error("validation failed at {path}: {source}")]
	Validation {
		/// Dotted field path of the rejected value, `$` for the root.
		path: String,
		/// Rejection reported by the validator.
		#[source]
		source: BoxError,
	},
	/// A decode capability failed.
	#[error("{capability} into {type_name}: {source}")]
	Capability {
		/// Capability name.
		capability: &'static str,
		/// Struct type being decoded.
		type_name: String,
		/// Capability failure.
		#[source]
		source: BoxError,
	},
	/// Recursion went deeper than the configured limit.
	#[error("assign depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Struct has no field with the requested name.
	#[error("{type_name} has no field {field}")]
	UnknownField {
		/// Struct type name.
		type_name: String,
		/// Requested field.
		field: String,
	},
	/// JSON encoding or parsing failed.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// JSON node does not fit the destination.
	#[error("cannot decode json {found} into {expected}")]
	JsonShape {
		/// Destination shape.
		expected: String,
		/// JSON node type.
		found: &'static str,
	},
	/// JSON number does not fit the destination width.
	#[error("json number {value} is out of range for {target}")]
	JsonRange {
		/// Destination scalar.
		target: &'static str,
		/// Offending number.
		value: String,
	},
	/// No decoder is registered for a content type.
	#[error("no decoder registered for content type {content_type:?}")]
	UnknownContentType {
		/// Normalized content type.
		content_type: String,
	},
	/// Field path expression is malformed.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Offending path expression.
		path: String,
	},
	/// Field path does not reach a value.
	#[error("no value at {path}")]
	PathNotFound {
		/// Path that was looked up.
		path: String,
	},
	/// Schema document is malformed or inconsistent.
	#[error("schema: {message}")]
	Schema {
		/// Human-readable problem.
		message: String,
	},
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
}

impl AssignError {
	/// Wrap `self` with a field name.
	pub fn in_field(self, name: impl Into<String>) -> Self {
		Self::Field {
			name: name.into(),
			source: Box::new(self),
		}
	}

	/// Innermost error after stripping context wrappers.
	pub fn root_cause(&self) -> &AssignError {
		match self {
			Self::Index { source, .. }
			| Self::Field { source, .. }
			| Self::Assign { source, .. }
			| Self::Invalid { source, .. } => source.root_cause(),
			other => other,
		}
	}
}
