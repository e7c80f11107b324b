use crate::conv::{AssignError, Result, Type};

/// Parsed type expression before struct names are resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TypeExpr {
	/// Built-in scalar or `any`.
	Builtin(Type),
	/// `*T`.
	Ptr(Box<TypeExpr>),
	/// `[]T`.
	Seq(Box<TypeExpr>),
	/// `map[K]V`.
	Map(Box<TypeExpr>, Box<TypeExpr>),
	/// Reference to a declared struct.
	Named(String),
}

impl TypeExpr {
	/// Build the runtime type, looking struct names up with `resolve`.
	pub(crate) fn build(&self, resolve: &mut dyn FnMut(&str) -> Result<Type>) -> Result<Type> {
		Ok(match self {
			Self::Builtin(ty) => ty.clone(),
			Self::Ptr(inner) => Type::ptr(inner.build(resolve)?),
			Self::Seq(inner) => Type::seq(inner.build(resolve)?),
			Self::Map(key, value) => Type::map(key.build(resolve)?, value.build(resolve)?),
			Self::Named(name) => resolve(name)?,
		})
	}
}

fn builtin(ident: &str) -> Option<Type> {
	Some(match ident {
		"bool" => Type::Bool,
		"i8" => Type::I8,
		"i16" => Type::I16,
		"i32" => Type::I32,
		"i64" | "int" => Type::I64,
		"u8" | "byte" => Type::U8,
		"u16" => Type::U16,
		"u32" => Type::U32,
		"u64" | "uint" => Type::U64,
		"f32" => Type::F32,
		"f64" | "float" => Type::F64,
		"string" => Type::String,
		"bytes" => Type::Bytes,
		"any" => Type::Any,
		_ => return None,
	})
}

/// Parse declarator text such as `map[string]*[]Address`.
pub(crate) fn parse_type_expr(raw: &str) -> Result<TypeExpr> {
	let (expr, rest) = parse_prefix(raw.trim(), raw)?;
	if !rest.trim().is_empty() {
		return Err(invalid(raw, "trailing input"));
	}
	Ok(expr)
}

fn invalid(raw: &str, reason: &str) -> AssignError {
	AssignError::Schema {
		message: format!("invalid type expression {raw:?}: {reason}"),
	}
}

fn parse_prefix<'a>(text: &'a str, raw: &str) -> Result<(TypeExpr, &'a str)> {
	let text = text.trim_start();
	if let Some(rest) = text.strip_prefix('*') {
		let (inner, rest) = parse_prefix(rest, raw)?;
		return Ok((TypeExpr::Ptr(Box::new(inner)), rest));
	}
	if let Some(rest) = text.strip_prefix("[]") {
		let (inner, rest) = parse_prefix(rest, raw)?;
		return Ok((TypeExpr::Seq(Box::new(inner)), rest));
	}
	if let Some(rest) = text.strip_prefix("map[") {
		let (key, rest) = parse_prefix(rest, raw)?;
		let Some(rest) = rest.trim_start().strip_prefix(']') else {
			return Err(invalid(raw, "expected `]` after map key"));
		};
		let (value, rest) = parse_prefix(rest, raw)?;
		return Ok((TypeExpr::Map(Box::new(key), Box::new(value)), rest));
	}

	let end = text.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(text.len());
	if end == 0 {
		return Err(invalid(raw, "expected a type name"));
	}
	let ident = &text[..end];
	let expr = match builtin(ident) {
		Some(ty) => TypeExpr::Builtin(ty),
		None => TypeExpr::Named(ident.to_owned()),
	};
	Ok((expr, &text[end..]))
}
