use std::fmt;
use std::sync::Arc;

use crate::conv::capability::Capabilities;
use crate::conv::value::{MapValue, PtrValue, SeqValue, StructValue, Value};

/// Static shape of a value slot, used to allocate zero values.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
	/// `bool`.
	Bool,
	/// `i8`.
	I8,
	/// `i16`.
	I16,
	/// `i32`.
	I32,
	/// `i64`.
	I64,
	/// `u8`.
	U8,
	/// `u16`.
	U16,
	/// `u32`.
	U32,
	/// `u64`.
	U64,
	/// `f32`.
	F32,
	/// `f64`.
	F64,
	/// UTF-8 text.
	String,
	/// Raw byte sequence.
	Bytes,
	/// Growable sequence of one element type.
	Seq(Box<Type>),
	/// Ordered mapping from key type to value type.
	Map(Box<Type>, Box<Type>),
	/// Named record.
	Struct(Arc<StructType>),
	/// Nullable indirection.
	Ptr(Box<Type>),
	/// Dynamic slot holding any value.
	Any,
}

impl Type {
	/// Sequence of `elem`.
	pub fn seq(elem: Type) -> Self {
		Self::Seq(Box::new(elem))
	}

	/// Mapping from `key` to `value`.
	pub fn map(key: Type, value: Type) -> Self {
		Self::Map(Box::new(key), Box::new(value))
	}

	/// Pointer to `elem`.
	pub fn ptr(elem: Type) -> Self {
		Self::Ptr(Box::new(elem))
	}

	/// Fresh zero value of this type.
	pub fn zero(&self) -> Value {
		match self {
			Self::Bool => Value::Bool(false),
			Self::I8 => Value::I8(0),
			Self::I16 => Value::I16(0),
			Self::I32 => Value::I32(0),
			Self::I64 => Value::I64(0),
			Self::U8 => Value::U8(0),
			Self::U16 => Value::U16(0),
			Self::U32 => Value::U32(0),
			Self::U64 => Value::U64(0),
			Self::F32 => Value::F32(0.0),
			Self::F64 => Value::F64(0.0),
			Self::String => Value::String(String::new()),
			Self::Bytes => Value::Bytes(Vec::new()),
			Self::Seq(elem) => Value::Seq(SeqValue {
				elem: (**elem).clone(),
				items: Vec::new(),
			}),
			Self::Map(key, value) => Value::Map(MapValue {
				key: (**key).clone(),
				value: (**value).clone(),
				entries: Vec::new(),
			}),
			Self::Struct(ty) => Value::Struct(StructValue::new(Arc::clone(ty))),
			Self::Ptr(elem) => Value::Ptr(PtrValue {
				elem: (**elem).clone(),
				target: None,
			}),
			Self::Any => Value::Interface(None),
		}
	}

	/// Zero value with every pointer allocated and every struct member deeply zeroed.
	pub fn deep_zero(&self) -> Value {
		match self {
			Self::Ptr(elem) => Value::Ptr(PtrValue {
				elem: (**elem).clone(),
				target: Some(Box::new(elem.deep_zero())),
			}),
			Self::Struct(ty) => Value::Struct(StructValue {
				ty: Arc::clone(ty),
				fields: ty.fields.iter().map(|field| field.ty.deep_zero()).collect(),
			}),
			other => other.zero(),
		}
	}

	/// Whether a value of type `self` can be stored into a slot of type `to` without coercion.
	pub fn assignable_to(&self, to: &Type) -> bool {
		self == to || matches!(to, Self::Any)
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool => f.write_str("bool"),
			Self::I8 => f.write_str("i8"),
			Self::I16 => f.write_str("i16"),
			Self::I32 => f.write_str("i32"),
			Self::I64 => f.write_str("i64"),
			Self::U8 => f.write_str("u8"),
			Self::U16 => f.write_str("u16"),
			Self::U32 => f.write_str("u32"),
			Self::U64 => f.write_str("u64"),
			Self::F32 => f.write_str("f32"),
			Self::F64 => f.write_str("f64"),
			Self::String => f.write_str("string"),
			Self::Bytes => f.write_str("bytes"),
			Self::Seq(elem) => write!(f, "[]{elem}"),
			Self::Map(key, value) => write!(f, "map[{key}]{value}"),
			Self::Struct(ty) => f.write_str(&ty.name),
			Self::Ptr(elem) => write!(f, "*{elem}"),
			Self::Any => f.write_str("any"),
		}
	}
}

/// One declared struct member.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
	/// Member name as declared.
	pub name: Box<str>,
	/// Member type.
	pub ty: Type,
	/// Embedded member populated from the whole parent source.
	pub inline: bool,
	/// Member that is neither written nor read by the engine.
	pub private: bool,
}

/// Runtime description of a named record type.
pub struct StructType {
	/// Type name.
	pub name: Box<str>,
	/// Members in declaration order.
	pub fields: Vec<FieldDecl>,
	capabilities: Option<Arc<dyn Capabilities>>,
}

impl StructType {
	/// Start building a struct type called `name`.
	pub fn builder(name: impl Into<Box<str>>) -> StructTypeBuilder {
		StructTypeBuilder {
			name: name.into(),
			fields: Vec::new(),
			capabilities: None,
		}
	}

	/// Index of the member called `name`.
	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|field| &*field.name == name)
	}

	/// Optional capabilities attached to this type.
	pub fn capabilities(&self) -> Option<&dyn Capabilities> {
		self.capabilities.as_deref()
	}
}

impl PartialEq for StructType {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self, other) || (self.name == other.name && self.fields == other.fields)
	}
}

impl fmt::Debug for StructType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StructType")
			.field("name", &self.name)
			.field("fields", &self.fields)
			.field("capabilities", &self.capabilities.is_some())
			.finish()
	}
}

/// Incremental constructor for [`StructType`].
pub struct StructTypeBuilder {
	name: Box<str>,
	fields: Vec<FieldDecl>,
	capabilities: Option<Arc<dyn Capabilities>>,
}

impl StructTypeBuilder {
	/// Append a public member.
	pub fn field(self, name: &str, ty: Type) -> Self {
		self.push(name, ty, false, false)
	}

	/// Append an embedded member.
	pub fn inline(self, name: &str, ty: Type) -> Self {
		self.push(name, ty, true, false)
	}

	/// Append a member the engine never touches.
	pub fn private(self, name: &str, ty: Type) -> Self {
		self.push(name, ty, false, true)
	}

	/// Append an explicit declaration.
	pub fn decl(mut self, decl: FieldDecl) -> Self {
		self.fields.push(decl);
		self
	}

	/// Attach capabilities implemented for this type.
	pub fn capabilities(mut self, capabilities: Arc<dyn Capabilities>) -> Self {
		self.capabilities = Some(capabilities);
		self
	}

	/// Finish the type.
	pub fn build(self) -> Arc<StructType> {
		Arc::new(StructType {
			name: self.name,
			fields: self.fields,
			capabilities: self.capabilities,
		})
	}

	fn push(self, name: &str, ty: Type, inline: bool, private: bool) -> Self {
		self.decl(FieldDecl {
			name: name.into(),
			ty,
			inline,
			private,
		})
	}
}

impl fmt::Debug for StructTypeBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StructTypeBuilder").field("name", &self.name).field("fields", &self.fields).finish()
	}
}
