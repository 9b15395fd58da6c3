//! Schema integrity checking.
//!
//! Value validation is deliberately lenient about a malformed schema: a
//! missing parent truncates the inherited field list, an unresolvable
//! type name surfaces as an error on the value being checked. Callers
//! that want to reject a bad contract up front run [`Schema::check`]
//! once at load time. Unlike value validation, the check does not stop
//! at the first problem; it reports every defect it finds.

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::{EnumDef, Schema, StructDef, TypeRef};

/// A single defect found in a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaIntegrityError {
    /// A struct extends a name that is not a struct in this schema.
    #[error("struct '{name}' extends unknown struct '{parent}'")]
    UnknownParent { name: String, parent: String },

    /// The extends relation loops back on itself.
    #[error("circular extends chain: {chain}")]
    ExtendsCycle { chain: String },

    /// A field references a type name that is neither a struct nor an enum.
    #[error("field '{field}' of struct '{name}' references unknown type '{type_name}'")]
    UnknownFieldType {
        name: String,
        field: String,
        type_name: String,
    },

    /// A struct or enum name is not a valid identifier.
    #[error("invalid type name '{name}'")]
    InvalidTypeName { name: String },

    /// A field name is not a valid identifier.
    #[error("invalid field name '{field}' in struct '{name}'")]
    InvalidFieldName { name: String, field: String },

    /// The same name is declared as both a struct and an enum.
    #[error("'{name}' is declared as both a struct and an enum")]
    DuplicateTypeName { name: String },

    /// A struct declares the same field name twice.
    #[error("duplicate field '{field}' in struct '{name}'")]
    DuplicateField { name: String, field: String },

    /// An enum declares the same value twice.
    #[error("duplicate value '{value}' in enum '{name}'")]
    DuplicateEnumValue { name: String, value: String },

    /// An enum declares no values, so no value could ever conform.
    #[error("enum '{name}' declares no values")]
    EmptyEnum { name: String },
}

/// A non-empty collection of integrity errors from one [`Schema::check`]
/// run, reported together so a bad schema can be fixed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityErrors(Vec<SchemaIntegrityError>);

impl IntegrityErrors {
    fn from_vec(errors: Vec<SchemaIntegrityError>) -> Self {
        debug_assert!(!errors.is_empty(), "IntegrityErrors requires at least one error");
        Self(errors)
    }

    /// Returns the number of errors collected. Always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never constructed empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the first error found.
    pub fn first(&self) -> &SchemaIntegrityError {
        &self.0[0]
    }

    /// Iterates over the errors in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaIntegrityError> {
        self.0.iter()
    }

    /// Consumes the collection, yielding the underlying vector.
    pub fn into_vec(self) -> Vec<SchemaIntegrityError> {
        self.0
    }
}

impl Display for IntegrityErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Integrity check failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for IntegrityErrors {}

impl IntoIterator for IntegrityErrors {
    type Item = SchemaIntegrityError;
    type IntoIter = std::vec::IntoIter<SchemaIntegrityError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IntegrityErrors {
    type Item = &'a SchemaIntegrityError;
    type IntoIter = std::slice::Iter<'a, SchemaIntegrityError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Schema {
    /// Checks the schema for structural defects and reports all of them.
    ///
    /// Verifies that names are well-formed and unique, that every
    /// `extends` parent exists and the extends relation is acyclic, that
    /// every field type resolves, and that no enum is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bouncer::{Schema, StructDef, TypeRef};
    ///
    /// let schema = Schema::new()
    ///     .with_struct(StructDef::new("User").extends("Missing"))
    ///     .with_struct(StructDef::new("Order").field("user", TypeRef::user_defined("Usr")));
    ///
    /// let errors = schema.check().unwrap_err();
    /// assert_eq!(errors.len(), 2);
    /// ```
    pub fn check(&self) -> Result<(), IntegrityErrors> {
        let mut errors = Vec::new();

        for def in self.structs() {
            check_struct_names(def, self, &mut errors);
        }
        for def in self.enums() {
            check_enum_names(def, &mut errors);
        }
        for def in self.structs() {
            check_struct_references(def, self, &mut errors);
        }
        check_extends_cycles(self, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(IntegrityErrors::from_vec(errors))
        }
    }
}

fn check_struct_names(def: &StructDef, schema: &Schema, errors: &mut Vec<SchemaIntegrityError>) {
    if !is_valid_type_name(&def.name) {
        errors.push(SchemaIntegrityError::InvalidTypeName {
            name: def.name.clone(),
        });
    }
    if schema.find_enum(&def.name).is_some() {
        errors.push(SchemaIntegrityError::DuplicateTypeName {
            name: def.name.clone(),
        });
    }

    let mut seen = HashSet::new();
    for field in &def.fields {
        if !is_valid_ident(&field.name) {
            errors.push(SchemaIntegrityError::InvalidFieldName {
                name: def.name.clone(),
                field: field.name.clone(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            errors.push(SchemaIntegrityError::DuplicateField {
                name: def.name.clone(),
                field: field.name.clone(),
            });
        }
    }
}

fn check_enum_names(def: &EnumDef, errors: &mut Vec<SchemaIntegrityError>) {
    if !is_valid_type_name(&def.name) {
        errors.push(SchemaIntegrityError::InvalidTypeName {
            name: def.name.clone(),
        });
    }
    if def.values.is_empty() {
        errors.push(SchemaIntegrityError::EmptyEnum {
            name: def.name.clone(),
        });
    }

    let mut seen = HashSet::new();
    for value in &def.values {
        if !seen.insert(value.as_str()) {
            errors.push(SchemaIntegrityError::DuplicateEnumValue {
                name: def.name.clone(),
                value: value.clone(),
            });
        }
    }
}

fn check_struct_references(
    def: &StructDef,
    schema: &Schema,
    errors: &mut Vec<SchemaIntegrityError>,
) {
    if let Some(parent) = def.extends.as_deref() {
        if schema.find_struct(parent).is_none() {
            errors.push(SchemaIntegrityError::UnknownParent {
                name: def.name.clone(),
                parent: parent.to_string(),
            });
        }
    }

    for field in &def.fields {
        check_type_ref(&field.type_ref, def, &field.name, schema, errors);
    }
}

/// Walks a type reference down to its leaf and verifies that a
/// `userDefined` leaf resolves to a struct or an enum.
fn check_type_ref(
    type_ref: &TypeRef,
    def: &StructDef,
    field: &str,
    schema: &Schema,
    errors: &mut Vec<SchemaIntegrityError>,
) {
    match type_ref {
        TypeRef::Builtin(_) => {}
        TypeRef::Array(element) => check_type_ref(element, def, field, schema, errors),
        TypeRef::Map(value) => check_type_ref(value, def, field, schema, errors),
        TypeRef::UserDefined(name) => {
            if schema.find_struct(name).is_none() && schema.find_enum(name).is_none() {
                errors.push(SchemaIntegrityError::UnknownFieldType {
                    name: def.name.clone(),
                    field: field.to_string(),
                    type_name: name.clone(),
                });
            }
        }
    }
}

/// Walks every extends chain and reports each cycle exactly once, with
/// the member names joined in traversal order, e.g. `A -> B -> A`.
///
/// Each struct has at most one parent, so a chain walk with a running
/// stack covers the whole relation; struct-typed fields are allowed to
/// be self-referential and are not part of this check.
fn check_extends_cycles(schema: &Schema, errors: &mut Vec<SchemaIntegrityError>) {
    let mut cleared: HashSet<&str> = HashSet::new();

    for def in schema.structs() {
        if cleared.contains(def.name.as_str()) {
            continue;
        }

        let mut stack: Vec<&str> = Vec::new();
        let mut current = Some(def);
        while let Some(d) = current {
            if let Some(start) = stack.iter().position(|n| *n == d.name) {
                let mut chain = stack[start..].join(" -> ");
                chain.push_str(" -> ");
                chain.push_str(&d.name);
                errors.push(SchemaIntegrityError::ExtendsCycle { chain });
                break;
            }
            if cleared.contains(d.name.as_str()) {
                break;
            }
            stack.push(d.name.as_str());
            current = d.extends.as_deref().and_then(|p| schema.find_struct(p));
        }

        cleared.extend(stack);
    }
}

/// A bare identifier: a letter followed by letters, digits or underscores.
fn is_valid_ident(name: &str) -> bool {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    let re = IDENT.get_or_init(|| {
        Regex::new("^[a-zA-Z][a-zA-Z0-9_]*$").expect("identifier pattern is valid")
    });
    re.is_match(name)
}

/// A type name: one or more dot-separated identifiers, so namespaced
/// names from a multi-file contract remain acceptable.
fn is_valid_type_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_ident)
}
