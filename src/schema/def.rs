//! Schema definition types.
//!
//! These are the entities an IDL compiler emits after parsing a contract:
//! struct definitions with optional inheritance, enum definitions, and the
//! type references that tie them together. The serde representation matches
//! the compiler's JSON output, so a schema document can be loaded directly:
//!
//! ```rust
//! use bouncer::Schema;
//!
//! let schema: Schema = serde_json::from_str(r#"{
//!     "structs": [
//!         {"name": "User", "fields": [
//!             {"name": "id", "type": {"builtIn": "int"}, "optional": false}
//!         ]}
//!     ],
//!     "enums": [
//!         {"name": "Platform", "values": ["kindle", "nook"]}
//!     ]
//! }"#).unwrap();
//!
//! assert!(schema.find_struct("User").is_some());
//! assert!(schema.find_enum("Platform").is_some());
//! ```

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// One of the four primitive types the IDL knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinKind {
    String,
    Int,
    Float,
    Bool,
}

impl BuiltinKind {
    /// Returns the IDL name of this primitive type.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinKind::String => "string",
            BuiltinKind::Int => "int",
            BuiltinKind::Float => "float",
            BuiltinKind::Bool => "bool",
        }
    }
}

impl Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reference to a type, as it appears in a field or parameter declaration.
///
/// Exactly one variant is populated. `UserDefined` names a struct or enum
/// and is resolved against the [`Schema`](crate::Schema) at validation
/// time, struct-first then enum. The serde form is externally tagged with
/// the compiler's key names: `{"builtIn": "string"}`, `{"array": {..}}`,
/// `{"mapValue": {..}}`, `{"userDefined": "User"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// A primitive type.
    #[serde(rename = "builtIn")]
    Builtin(BuiltinKind),
    /// An ordered sequence with a single element type.
    #[serde(rename = "array")]
    Array(Box<TypeRef>),
    /// A string-keyed mapping; only the value type is declared.
    #[serde(rename = "mapValue")]
    Map(Box<TypeRef>),
    /// A struct or enum referenced by name.
    #[serde(rename = "userDefined")]
    UserDefined(String),
}

impl TypeRef {
    /// Creates a `string` type reference.
    pub fn string() -> Self {
        TypeRef::Builtin(BuiltinKind::String)
    }

    /// Creates an `int` type reference.
    pub fn int() -> Self {
        TypeRef::Builtin(BuiltinKind::Int)
    }

    /// Creates a `float` type reference.
    pub fn float() -> Self {
        TypeRef::Builtin(BuiltinKind::Float)
    }

    /// Creates a `bool` type reference.
    pub fn bool() -> Self {
        TypeRef::Builtin(BuiltinKind::Bool)
    }

    /// Creates an array type reference with the given element type.
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// Creates a map type reference with the given value type. Map keys
    /// are implicitly strings and are not declared.
    pub fn map(value: TypeRef) -> Self {
        TypeRef::Map(Box::new(value))
    }

    /// Creates a reference to a struct or enum by name.
    pub fn user_defined(name: impl Into<String>) -> Self {
        TypeRef::UserDefined(name.into())
    }
}

impl Display for TypeRef {
    /// Renders the reference in IDL surface syntax: `[]string`,
    /// `map[string]int`, `User`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Builtin(kind) => write!(f, "{}", kind),
            TypeRef::Array(element) => write!(f, "[]{}", element),
            TypeRef::Map(value) => write!(f, "map[string]{}", value),
            TypeRef::UserDefined(name) => write!(f, "{}", name),
        }
    }
}

/// A single field declaration within a struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, unique within its declaring struct.
    pub name: String,
    /// The declared type of the field's value.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Whether the field may be absent or null.
    #[serde(default)]
    pub optional: bool,
}

impl FieldDef {
    /// Creates a required field.
    pub fn required(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            optional: false,
        }
    }

    /// Creates an optional field.
    pub fn optional(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            optional: true,
        }
    }
}

/// A struct definition: an ordered field list, optionally inheriting the
/// fields of a parent struct via `extends`.
///
/// Definitions are built fluently for in-code schemas and tests:
///
/// ```rust
/// use bouncer::{StructDef, TypeRef};
///
/// let user = StructDef::new("User")
///     .extends("Base")
///     .field("name", TypeRef::string())
///     .optional("email", TypeRef::string());
///
/// assert_eq!(user.fields.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    /// Struct name, the key it is looked up under.
    pub name: String,
    /// Parent struct name, if this struct extends another.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Field declarations in source order.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl StructDef {
    /// Creates a struct definition with no parent and no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            fields: Vec::new(),
        }
    }

    /// Sets the parent struct this definition extends.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Appends a required field.
    pub fn field(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.fields.push(FieldDef::required(name, type_ref));
        self
    }

    /// Appends an optional field.
    pub fn optional(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.fields.push(FieldDef::optional(name, type_ref));
        self
    }
}

/// An enum definition: a closed, ordered set of allowed string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Enum name, the key it is looked up under.
    pub name: String,
    /// Allowed values in declaration order.
    #[serde(default)]
    pub values: Vec<String>,
}

impl EnumDef {
    /// Creates an enum definition from its name and allowed values.
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}
