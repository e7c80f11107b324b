/// Schema-driven assignment command.
pub mod assign;
/// Single value coercion command.
pub mod coerce;
/// Name splitting and case conversion command.
pub mod names;
/// Shared output helpers.
pub mod util;
