use std::sync::Arc;

use crate::conv::{AssignError, Result, StructType, Type};

/// Runtime-typed value handled by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Untyped nil.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// 8-bit signed integer.
	I8(i8),
	/// 16-bit signed integer.
	I16(i16),
	/// 32-bit signed integer.
	I32(i32),
	/// 64-bit signed integer.
	I64(i64),
	/// 8-bit unsigned integer.
	U8(u8),
	/// 16-bit unsigned integer.
	U16(u16),
	/// 32-bit unsigned integer.
	U32(u32),
	/// 64-bit unsigned integer.
	U64(u64),
	/// 32-bit float.
	F32(f32),
	/// 64-bit float.
	F64(f64),
	/// UTF-8 text.
	String(String),
	/// Raw bytes.
	Bytes(Vec<u8>),
	/// Typed sequence.
	Seq(SeqValue),
	/// Typed, insertion-ordered mapping.
	Map(MapValue),
	/// Record instance.
	Struct(StructValue),
	/// Nullable indirection.
	Ptr(PtrValue),
	/// Dynamic slot; `None` is a nil interface.
	Interface(Option<Box<Value>>),
}

/// Sequence items with their declared element type.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqValue {
	/// Element type used for freshly allocated items.
	pub elem: Type,
	/// Items in order.
	pub items: Vec<Value>,
}

/// Mapping entries with declared key and value types.
#[derive(Debug, Clone, PartialEq)]
pub struct MapValue {
	/// Key type.
	pub key: Type,
	/// Value type.
	pub value: Type,
	/// Entries in iteration order; keys are unique.
	pub entries: Vec<(Value, Value)>,
}

/// Pointer with its pointee type.
#[derive(Debug, Clone, PartialEq)]
pub struct PtrValue {
	/// Pointee type used when allocating through a nil pointer.
	pub elem: Type,
	/// Pointee, `None` when nil.
	pub target: Option<Box<Value>>,
}

/// Record instance whose fields line up with `ty.fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	/// Record type.
	pub ty: Arc<StructType>,
	/// Field values in declaration order.
	pub fields: Vec<Value>,
}

impl Value {
	/// Wrap `value` in a non-nil interface slot.
	pub fn any(value: impl Into<Value>) -> Self {
		Self::Interface(Some(Box::new(value.into())))
	}

	/// Non-nil pointer to `value`, typed by the value itself.
	pub fn ptr_to(value: impl Into<Value>) -> Self {
		let value = value.into();
		Self::Ptr(PtrValue {
			elem: crate::conv::type_of(&value),
			target: Some(Box::new(value)),
		})
	}

	/// Sequence of `elem` holding `items`.
	pub fn seq(elem: Type, items: impl IntoIterator<Item = Value>) -> Self {
		Self::Seq(SeqValue {
			elem,
			items: items.into_iter().collect(),
		})
	}

	/// Mapping from `key` to `value` types holding `entries`.
	pub fn map(key: Type, value: Type, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
		let mut map = MapValue {
			key,
			value,
			entries: Vec::new(),
		};
		for (k, v) in entries {
			map.insert(k, v);
		}
		Self::Map(map)
	}

	/// `true` for the untyped nil.
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Rendered type of this value.
	pub fn type_name(&self) -> String {
		match self {
			Self::Null => "nil".to_owned(),
			other => crate::conv::type_of(other).to_string(),
		}
	}

	/// Borrow as struct, looking through indirections.
	pub fn as_struct(&self) -> Option<&StructValue> {
		match crate::conv::deref_for_reading(self) {
			Self::Struct(item) => Some(item),
			_ => None,
		}
	}

	/// Borrow as text, looking through indirections.
	pub fn as_str(&self) -> Option<&str> {
		match crate::conv::deref_for_reading(self) {
			Self::String(text) => Some(text),
			_ => None,
		}
	}

	/// Look up a struct field by name, looking through indirections.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.as_struct().and_then(|item| item.field(name))
	}
}

impl MapValue {
	/// Insert or replace the entry for `key`, returning the previous value.
	pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
		if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
			return Some(std::mem::replace(&mut slot.1, value));
		}
		self.entries.push((key, value));
		None
	}

	/// Value stored for `key`.
	pub fn get(&self, key: &Value) -> Option<&Value> {
		self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	/// Value stored under a string key, also matching keys held in interface slots.
	pub fn get_str(&self, key: &str) -> Option<&Value> {
		self.entries
			.iter()
			.find(|(k, _)| k.as_str() == Some(key))
			.map(|(_, v)| v)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// `true` when there are no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl StructValue {
	/// Zero-valued instance of `ty`.
	pub fn new(ty: Arc<StructType>) -> Self {
		let fields = ty.fields.iter().map(|field| field.ty.zero()).collect();
		Self { ty, fields }
	}

	/// Field value by name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.ty.field_index(name).and_then(|idx| self.fields.get(idx))
	}

	/// Mutable field value by name.
	pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
		let idx = self.ty.field_index(name)?;
		self.fields.get_mut(idx)
	}

	/// Replace the field called `name`.
	pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
		let type_name = self.ty.name.to_string();
		let slot = self.field_mut(name).ok_or_else(|| AssignError::UnknownField {
			type_name,
			field: name.to_owned(),
		})?;
		*slot = value.into();
		Ok(())
	}

	/// Builder-style [`StructValue::set`].
	pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
		self.set(name, value)?;
		Ok(self)
	}
}

impl From<StructValue> for Value {
	fn from(value: StructValue) -> Self {
		Self::Struct(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Self::Bytes(value)
	}
}

macro_rules! value_from {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Self::$variant(value)
				}
			}
		)*
	};
}

value_from!(
	bool => Bool,
	i8 => I8,
	i16 => I16,
	i32 => I32,
	i64 => I64,
	u8 => U8,
	u16 => U16,
	u32 => U32,
	u64 => U64,
	f32 => F32,
	f64 => F64,
	String => String,
);
