//! Best-effort structural assignment and scalar coercion between dynamic values.

/// Dynamic values, coercion, name matching, and the assignment engine.
pub mod conv;
