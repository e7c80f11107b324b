//! JSON schema documents describing struct types.
//!
//! ```json
//! { "root": "Person",
//!   "types": { "Person": { "fields": [ { "name": "Name", "type": "string" } ] } } }
//! ```

mod expr;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::conv::schema::expr::parse_type_expr;
use crate::conv::{AssignError, FieldDecl, Result, StructType, Type, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDoc {
	root: String,
	#[serde(default)]
	types: BTreeMap<String, TypeDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeDoc {
	#[serde(default)]
	fields: Vec<FieldDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDoc {
	name: String,
	#[serde(rename = "type")]
	ty: String,
	#[serde(default)]
	inline: bool,
	#[serde(default)]
	private: bool,
}

/// Resolved set of struct types plus the root destination type.
#[derive(Debug, Clone)]
pub struct Schema {
	root: Type,
	types: BTreeMap<String, Arc<StructType>>,
}

impl Schema {
	/// Parse a schema document.
	pub fn parse(json: &str) -> Result<Self> {
		let doc: SchemaDoc = serde_json::from_str(json)?;
		let mut resolver = Resolver {
			doc: &doc,
			done: HashMap::new(),
			visiting: Vec::new(),
		};

		// Resolve every declared type so unused ones are still checked.
		for name in doc.types.keys() {
			resolver.resolve(name)?;
		}
		let root_expr = parse_type_expr(&doc.root)?;
		let root = root_expr.build(&mut |name: &str| resolver.resolve(name).map(Type::Struct))?;

		Ok(Self {
			root,
			types: resolver.done.into_iter().collect(),
		})
	}

	/// Read and parse a schema file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let text = std::fs::read_to_string(path)?;
		Self::parse(&text)
	}

	/// Root destination type.
	pub fn root(&self) -> &Type {
		&self.root
	}

	/// Fresh zero destination of the root type.
	pub fn root_value(&self) -> Value {
		self.root.zero()
	}

	/// Struct type declared as `name`.
	pub fn get(&self, name: &str) -> Option<&Arc<StructType>> {
		self.types.get(name)
	}

	/// Declared type names in sorted order.
	pub fn type_names(&self) -> impl Iterator<Item = &str> {
		self.types.keys().map(String::as_str)
	}

	/// Resolve a type expression against the declared structs.
	pub fn resolve_type(&self, raw: &str) -> Result<Type> {
		parse_type_expr(raw)?.build(&mut |name: &str| self.get(name).cloned().map(Type::Struct).ok_or_else(|| unknown(name)))
	}
}

/// Parse a type expression made only of built-in types.
pub fn parse_type(raw: &str) -> Result<Type> {
	parse_type_expr(raw)?.build(&mut |name: &str| Err(unknown(name)))
}

fn unknown(name: &str) -> AssignError {
	AssignError::Schema {
		message: format!("unknown type {name:?}"),
	}
}

struct Resolver<'a> {
	doc: &'a SchemaDoc,
	done: HashMap<String, Arc<StructType>>,
	visiting: Vec<String>,
}

impl Resolver<'_> {
	fn resolve(&mut self, name: &str) -> Result<Arc<StructType>> {
		if let Some(ty) = self.done.get(name) {
			return Ok(Arc::clone(ty));
		}
		if self.visiting.iter().any(|open| open == name) {
			self.visiting.push(name.to_owned());
			return Err(AssignError::Schema {
				message: format!("recursive type: {}", self.visiting.join(" -> ")),
			});
		}
		let doc = self.doc;
		let decl = doc.types.get(name).ok_or_else(|| unknown(name))?;

		self.visiting.push(name.to_owned());
		let mut builder = StructType::builder(name);
		for (idx, field) in decl.fields.iter().enumerate() {
			if decl.fields[..idx].iter().any(|earlier| earlier.name == field.name) {
				return Err(AssignError::Schema {
					message: format!("{name} declares field {:?} twice", field.name),
				});
			}
			let ty = parse_type_expr(&field.ty)?.build(&mut |dep: &str| self.resolve(dep).map(Type::Struct))?;
			log::trace!("resolved {name}.{}: {ty}", field.name);
			if field.inline && !matches!(strip_ptr(&ty), Type::Struct(_)) {
				return Err(AssignError::Schema {
					message: format!("inline field {name}.{} must be a struct or pointer to struct", field.name),
				});
			}
			builder = builder.decl(FieldDecl {
				name: field.name.as_str().into(),
				ty,
				inline: field.inline,
				private: field.private,
			});
		}
		self.visiting.pop();

		let built = builder.build();
		self.done.insert(name.to_owned(), Arc::clone(&built));
		Ok(built)
	}
}

fn strip_ptr(ty: &Type) -> &Type {
	match ty {
		Type::Ptr(inner) => strip_ptr(inner),
		other => other,
	}
}
