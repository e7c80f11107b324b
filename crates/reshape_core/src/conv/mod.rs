mod assign;
mod bytes;
pub mod capability;
pub mod coerce;
mod copy;
mod error;
mod introspect;
mod json;
pub mod name;
mod path;
pub mod registry;
mod report;
pub mod schema;
mod types;
mod validate;
mod value;

/// Structural assignment entry points and options.
pub use assign::{AssignOptions, Assigner, assign, assign_with};
/// Raw byte setter.
pub use bytes::set_bytes;
/// Capability traits a struct type can expose.
pub use capability::{Capabilities, DecodeBinary, DecodeJson, DecodeText, Describe, Validate};
/// JSON round-trip copier.
pub use copy::copy_by_round_trip;
/// Error and result aliases.
pub use error::{AssignError, BoxError, CoerceError, Result};
/// Indirection helpers and kind classification.
pub use introspect::{Kind, classify, deref_for_reading, is_nil, is_zero, resolve_writable, type_of};
/// Strict decoding of a JSON document into an existing value.
pub use json::decode_into;
/// Name matching policies.
pub use name::{AliasMatcher, DefaultMatcher, ExactMatcher, NameMatcher};
/// Field path parser types.
pub use path::{FieldPath, PathStep};
/// Content-type keyed decoders.
pub use registry::DecoderRegistry;
/// Recovered per-field failures.
pub use report::{Issue, Report};
/// Schema documents.
pub use schema::Schema;
/// Runtime type descriptions.
pub use types::{FieldDecl, StructType, StructTypeBuilder, Type};
/// Post-assignment validation.
pub use validate::validate;
/// Dynamic value types.
pub use value::{MapValue, PtrValue, SeqValue, StructValue, Value};
