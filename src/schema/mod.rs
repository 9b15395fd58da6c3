//! The schema: a named collection of struct and enum definitions.
//!
//! A [`Schema`] is the contract values are checked against. It is loaded
//! once, either from the JSON document an IDL compiler emits or built
//! fluently in code, and then shared immutably across validation calls.
//!
//! # Example
//!
//! ```rust
//! use bouncer::{EnumDef, Schema, StructDef, TypeRef};
//!
//! let schema = Schema::new()
//!     .with_struct(
//!         StructDef::new("Book")
//!             .field("title", TypeRef::string())
//!             .field("platform", TypeRef::user_defined("Platform")),
//!     )
//!     .with_enum(EnumDef::new("Platform", ["kindle", "nook"]));
//!
//! assert!(schema.find_struct("Book").is_some());
//! assert!(schema.find_enum("Platform").is_some());
//! assert!(schema.find_struct("book").is_none());
//! ```

mod def;
mod integrity;

pub use def::{BuiltinKind, EnumDef, FieldDef, StructDef, TypeRef};
pub use integrity::{IntegrityErrors, SchemaIntegrityError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An immutable IDL contract: struct and enum definitions keyed by name.
///
/// Lookups are exact and case-sensitive. Iteration preserves the order in
/// which definitions were declared, which keeps integrity reports and
/// serialized output stable.
///
/// The serde representation is the compiler's schema document, an object
/// with `structs` and `enums` arrays; either may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SchemaDoc", into = "SchemaDoc")]
pub struct Schema {
    structs: IndexMap<String, StructDef>,
    enums: IndexMap<String, EnumDef>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a struct definition, keyed by its name. A later definition
    /// with the same name replaces the earlier one.
    pub fn with_struct(mut self, def: StructDef) -> Self {
        self.structs.insert(def.name.clone(), def);
        self
    }

    /// Adds an enum definition, keyed by its name. A later definition
    /// with the same name replaces the earlier one.
    pub fn with_enum(mut self, def: EnumDef) -> Self {
        self.enums.insert(def.name.clone(), def);
        self
    }

    /// Looks up a struct definition by exact name.
    pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    /// Looks up an enum definition by exact name.
    pub fn find_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    /// Iterates over struct definitions in declaration order.
    pub fn structs(&self) -> impl Iterator<Item = &StructDef> {
        self.structs.values()
    }

    /// Iterates over enum definitions in declaration order.
    pub fn enums(&self) -> impl Iterator<Item = &EnumDef> {
        self.enums.values()
    }

    /// Returns true if the schema holds no definitions at all.
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty() && self.enums.is_empty()
    }
}

/// The schema document as it appears on the wire.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SchemaDoc {
    #[serde(default)]
    structs: Vec<StructDef>,
    #[serde(default)]
    enums: Vec<EnumDef>,
}

impl From<SchemaDoc> for Schema {
    fn from(doc: SchemaDoc) -> Self {
        let mut schema = Schema::new();
        for def in doc.structs {
            schema = schema.with_struct(def);
        }
        for def in doc.enums {
            schema = schema.with_enum(def);
        }
        schema
    }
}

impl From<Schema> for SchemaDoc {
    fn from(schema: Schema) -> Self {
        SchemaDoc {
            structs: schema.structs.into_values().collect(),
            enums: schema.enums.into_values().collect(),
        }
    }
}
