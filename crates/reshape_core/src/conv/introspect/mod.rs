use std::fmt;

use crate::conv::{PtrValue, Type, Value};

/// Classification tag used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// Untyped nil.
	Nil,
	/// Boolean.
	Bool,
	/// Signed integer family.
	Int,
	/// Unsigned integer family.
	Uint,
	/// Floating point family.
	Float,
	/// Text.
	String,
	/// Byte sequence.
	Bytes,
	/// Sequence.
	Seq,
	/// Mapping.
	Map,
	/// Record.
	Struct,
	/// Pointer; after dereferencing this only remains for nil pointers.
	Ptr,
	/// Interface slot; after dereferencing this only remains for nil interfaces.
	Interface,
}

impl Kind {
	/// Kind of `value` itself, without looking through indirections.
	pub fn of(value: &Value) -> Self {
		match value {
			Value::Null => Self::Nil,
			Value::Bool(_) => Self::Bool,
			Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_) => Self::Int,
			Value::U8(_) | Value::U16(_) | Value::U32(_) | Value::U64(_) => Self::Uint,
			Value::F32(_) | Value::F64(_) => Self::Float,
			Value::String(_) => Self::String,
			Value::Bytes(_) => Self::Bytes,
			Value::Seq(_) => Self::Seq,
			Value::Map(_) => Self::Map,
			Value::Struct(_) => Self::Struct,
			Value::Ptr(_) => Self::Ptr,
			Value::Interface(_) => Self::Interface,
		}
	}

	fn name(self) -> &'static str {
		match self {
			Self::Nil => "nil",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Uint => "uint",
			Self::Float => "float",
			Self::String => "string",
			Self::Bytes => "bytes",
			Self::Seq => "sequence",
			Self::Map => "map",
			Self::Struct => "struct",
			Self::Ptr => "pointer",
			Self::Interface => "interface",
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Follow pointer and interface indirection down to a base value or a nil link.
pub fn deref_for_reading(value: &Value) -> &Value {
	let mut current = value;
	loop {
		match current {
			Value::Ptr(ptr) => match &ptr.target {
				Some(inner) => current = &**inner,
				None => return current,
			},
			Value::Interface(Some(inner)) => current = &**inner,
			_ => return current,
		}
	}
}

/// Follow pointer indirection to a settable location.
///
/// With `allocate`, nil pointers receive a fresh zero pointee and the walk continues; otherwise
/// the walk stops at the first nil pointer and returns it.
pub fn resolve_writable(value: &mut Value, allocate: bool) -> &mut Value {
	if let Value::Ptr(ptr) = value {
		if ptr.target.is_none() && allocate {
			ptr.target = Some(Box::new(ptr.elem.zero()));
		}
	}
	match value {
		Value::Ptr(PtrValue { target: Some(inner), .. }) => resolve_writable(inner, allocate),
		other => other,
	}
}

/// Kind of the value reached by [`deref_for_reading`].
pub fn classify(value: &Value) -> Kind {
	Kind::of(deref_for_reading(value))
}

/// `true` for the untyped nil, nil pointers, and nil interfaces.
pub fn is_nil(value: &Value) -> bool {
	matches!(
		deref_for_reading(value),
		Value::Null | Value::Ptr(_) | Value::Interface(None)
	)
}

/// `true` when `value` equals the zero value of its own type.
///
/// Empty sequences, maps, and byte strings count as zero.
pub fn is_zero(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(v) => !v,
		Value::I8(v) => *v == 0,
		Value::I16(v) => *v == 0,
		Value::I32(v) => *v == 0,
		Value::I64(v) => *v == 0,
		Value::U8(v) => *v == 0,
		Value::U16(v) => *v == 0,
		Value::U32(v) => *v == 0,
		Value::U64(v) => *v == 0,
		Value::F32(v) => *v == 0.0,
		Value::F64(v) => *v == 0.0,
		Value::String(v) => v.is_empty(),
		Value::Bytes(v) => v.is_empty(),
		Value::Seq(seq) => seq.items.is_empty(),
		Value::Map(map) => map.entries.is_empty(),
		Value::Struct(item) => item.fields.iter().all(is_zero),
		Value::Ptr(ptr) => ptr.target.is_none(),
		Value::Interface(slot) => slot.is_none(),
	}
}

/// Static type of `value`.
///
/// The untyped nil has no type of its own and reports [`Type::Any`].
pub fn type_of(value: &Value) -> Type {
	match value {
		Value::Null | Value::Interface(_) => Type::Any,
		Value::Bool(_) => Type::Bool,
		Value::I8(_) => Type::I8,
		Value::I16(_) => Type::I16,
		Value::I32(_) => Type::I32,
		Value::I64(_) => Type::I64,
		Value::U8(_) => Type::U8,
		Value::U16(_) => Type::U16,
		Value::U32(_) => Type::U32,
		Value::U64(_) => Type::U64,
		Value::F32(_) => Type::F32,
		Value::F64(_) => Type::F64,
		Value::String(_) => Type::String,
		Value::Bytes(_) => Type::Bytes,
		Value::Seq(seq) => Type::seq(seq.elem.clone()),
		Value::Map(map) => Type::map(map.key.clone(), map.value.clone()),
		Value::Struct(item) => Type::Struct(item.ty.clone()),
		Value::Ptr(ptr) => Type::ptr(ptr.elem.clone()),
	}
}
