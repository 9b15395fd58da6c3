//! Recursive structural validation of values against a schema.
//!
//! This module provides the [`Validator`] that walks a decoded JSON value
//! alongside a type reference and reports the first point where the value
//! does not conform. Validation never mutates the value and never coerces
//! between types.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{ErrorKind, ValidationError};
use crate::path::ValuePath;
use crate::resolve::{resolve_struct_fields, FieldCache};
use crate::schema::{BuiltinKind, EnumDef, FieldDef, Schema, TypeRef};
use crate::ValidationResult;

/// Default cap on named-type hops before validation gives up.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Checks a value against a type reference in one call.
///
/// `optional` states whether the value's slot tolerates null; it applies
/// to this value only, never to elements or map values further down.
///
/// # Example
///
/// ```rust
/// use bouncer::{validate_type, Schema, TypeRef};
/// use serde_json::json;
///
/// let schema = Schema::new();
/// let ty = TypeRef::array(TypeRef::int());
///
/// assert!(validate_type(&json!([1, 2, 3]), &ty, &schema, false).is_ok());
///
/// let err = validate_type(&json!([1, "two"]), &ty, &schema, false).unwrap_err();
/// assert_eq!(err.path.to_string(), "[1]");
/// ```
pub fn validate_type(
    value: &Value,
    type_ref: &TypeRef,
    schema: &Schema,
    optional: bool,
) -> ValidationResult {
    Validator::new(schema).validate(value, type_ref, optional)
}

/// Checks a value against a struct or enum looked up by name.
///
/// The slot is treated as non-optional, matching a bare top-level value.
pub fn validate_named(value: &Value, type_name: &str, schema: &Schema) -> ValidationResult {
    Validator::new(schema).validate_named(value, type_name)
}

/// A validation pass configured against one schema.
///
/// The validator borrows the schema and is cheap to construct; build one
/// per call site or keep one alive next to the schema. Attaching a
/// [`FieldCache`] with [`with_cache`](Validator::with_cache) memoizes
/// struct field resolution across calls.
///
/// # Example
///
/// ```rust
/// use bouncer::{Schema, StructDef, TypeRef, Validator};
/// use serde_json::json;
///
/// let schema = Schema::new().with_struct(
///     StructDef::new("User")
///         .field("id", TypeRef::int())
///         .optional("email", TypeRef::string()),
/// );
///
/// let validator = Validator::new(&schema);
/// assert!(validator
///     .validate_named(&json!({"id": 7}), "User")
///     .is_ok());
///
/// let err = validator
///     .validate_named(&json!({"email": "a@b.c"}), "User")
///     .unwrap_err();
/// assert_eq!(err.path.to_string(), "id");
/// ```
#[derive(Clone, Copy)]
pub struct Validator<'s> {
    schema: &'s Schema,
    cache: Option<&'s FieldCache>,
    max_depth: usize,
}

impl<'s> Validator<'s> {
    /// Creates a validator over `schema` with the default depth limit
    /// and no field cache.
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            cache: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Attaches a field cache shared with other validators.
    pub fn with_cache(mut self, cache: &'s FieldCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Overrides the maximum number of named-type hops.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Checks `value` against `type_ref`, stopping at the first mismatch.
    pub fn validate(&self, value: &Value, type_ref: &TypeRef, optional: bool) -> ValidationResult {
        self.validate_at(value, type_ref, optional, &ValuePath::root(), 0)
    }

    /// Checks `value` against the struct or enum named `type_name`.
    pub fn validate_named(&self, value: &Value, type_name: &str) -> ValidationResult {
        self.validate_user_defined(value, type_name, &ValuePath::root(), 0)
    }

    fn validate_at(
        &self,
        value: &Value,
        type_ref: &TypeRef,
        optional: bool,
        path: &ValuePath,
        depth: usize,
    ) -> ValidationResult {
        // Null is settled before any type dispatch; this is the only
        // place the optional flag is consulted.
        if value.is_null() {
            if optional {
                return Ok(());
            }
            return Err(ValidationError::new(
                ErrorKind::NullNotAllowed,
                path.clone(),
                "value cannot be null for non-optional type",
            ));
        }

        match type_ref {
            TypeRef::Builtin(kind) => validate_builtin(value, *kind, path),
            TypeRef::Array(element) => {
                let Value::Array(items) = value else {
                    return Err(type_mismatch(path, "array", value));
                };
                for (index, item) in items.iter().enumerate() {
                    self.validate_at(item, element, false, &path.push_index(index), depth)?;
                }
                Ok(())
            }
            TypeRef::Map(value_type) => {
                let Value::Object(entries) = value else {
                    return Err(type_mismatch(path, "map", value));
                };
                for (key, entry) in entries {
                    self.validate_at(entry, value_type, false, &path.push_key(key), depth)?;
                }
                Ok(())
            }
            TypeRef::UserDefined(name) => self.validate_user_defined(value, name, path, depth),
        }
    }

    /// Resolves a named type, struct first and enum second, and checks
    /// the value against it. Called once per hop through a name, which
    /// is what the depth limit counts.
    fn validate_user_defined(
        &self,
        value: &Value,
        name: &str,
        path: &ValuePath,
        depth: usize,
    ) -> ValidationResult {
        if value.is_null() {
            return Err(ValidationError::new(
                ErrorKind::NullNotAllowed,
                path.clone(),
                "value cannot be null for non-optional type",
            ));
        }
        if depth >= self.max_depth {
            return Err(ValidationError::new(
                ErrorKind::DepthLimitExceeded,
                path.clone(),
                format!(
                    "maximum reference depth {} exceeded while resolving '{}'",
                    self.max_depth, name
                ),
            ));
        }

        if self.schema.find_struct(name).is_some() {
            return self.validate_struct(value, name, path, depth + 1);
        }
        if let Some(enum_def) = self.schema.find_enum(name) {
            return validate_enum(value, enum_def, path);
        }
        Err(ValidationError::new(
            ErrorKind::UnknownType,
            path.clone(),
            format!("unknown user-defined type '{}'", name),
        ))
    }

    fn validate_struct(
        &self,
        value: &Value,
        struct_name: &str,
        path: &ValuePath,
        depth: usize,
    ) -> ValidationResult {
        let Value::Object(record) = value else {
            let got = value_type_name(value);
            return Err(ValidationError::new(
                ErrorKind::TypeMismatch,
                path.clone(),
                format!("expected object for struct '{}', got {}", struct_name, got),
            )
            .with_expected("object")
            .with_got(got));
        };

        // Keys the schema does not declare are ignored.
        let fields = self.resolved_fields(struct_name);
        for field in fields.iter() {
            self.validate_field(record.get(&field.name), field, struct_name, path, depth)?;
        }
        Ok(())
    }

    fn validate_field(
        &self,
        value: Option<&Value>,
        field: &FieldDef,
        struct_name: &str,
        path: &ValuePath,
        depth: usize,
    ) -> ValidationResult {
        let field_path = path.push_field(&field.name);
        match value {
            None => {
                if field.optional {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        ErrorKind::MissingRequiredField,
                        field_path,
                        format!(
                            "missing required field '{}' in struct '{}'",
                            field.name, struct_name
                        ),
                    ))
                }
            }
            Some(Value::Null) => {
                if field.optional {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        ErrorKind::NullNotAllowed,
                        field_path,
                        format!(
                            "field '{}' in struct '{}' cannot be null",
                            field.name, struct_name
                        ),
                    ))
                }
            }
            Some(field_value) => self.validate_at(
                field_value,
                &field.type_ref,
                field.optional,
                &field_path,
                depth,
            ),
        }
    }

    fn resolved_fields(&self, struct_name: &str) -> Arc<[FieldDef]> {
        match self.cache {
            Some(cache) => cache.resolved(struct_name, self.schema),
            None => resolve_struct_fields(struct_name, self.schema).into(),
        }
    }
}

fn validate_builtin(value: &Value, kind: BuiltinKind, path: &ValuePath) -> ValidationResult {
    let conforms = match kind {
        BuiltinKind::String => value.is_string(),
        // An integral float like 3.0 counts as an int; 3.14 does not.
        BuiltinKind::Int => is_integral_number(value),
        // Every number is acceptable where a float is declared.
        BuiltinKind::Float => value.is_number(),
        BuiltinKind::Bool => value.is_boolean(),
    };

    if conforms {
        Ok(())
    } else {
        Err(type_mismatch(path, kind.name(), value))
    }
}

fn validate_enum(value: &Value, enum_def: &EnumDef, path: &ValuePath) -> ValidationResult {
    let Value::String(candidate) = value else {
        let got = value_type_name(value);
        return Err(ValidationError::new(
            ErrorKind::TypeMismatch,
            path.clone(),
            format!("expected string for enum '{}', got {}", enum_def.name, got),
        )
        .with_expected("string")
        .with_got(got));
    };

    if enum_def.values.iter().any(|allowed| allowed == candidate) {
        Ok(())
    } else {
        Err(ValidationError::new(
            ErrorKind::InvalidEnumValue,
            path.clone(),
            format!(
                "invalid value '{}' for enum '{}', allowed values: [{}]",
                candidate,
                enum_def.name,
                enum_def.values.join(", ")
            ),
        )
        .with_expected(format!("one of [{}]", enum_def.values.join(", ")))
        .with_got(candidate.clone()))
    }
}

fn is_integral_number(value: &Value) -> bool {
    let Value::Number(number) = value else {
        return false;
    };
    number.is_i64()
        || number.is_u64()
        || number.as_f64().is_some_and(|f| f.fract() == 0.0)
}

fn type_mismatch(path: &ValuePath, expected: &str, value: &Value) -> ValidationError {
    let got = value_type_name(value);
    ValidationError::new(
        ErrorKind::TypeMismatch,
        path.clone(),
        format!("expected {}, got {}", expected, got),
    )
    .with_expected(expected)
    .with_got(got)
}

/// Names a value's shape in IDL vocabulary for error messages.
fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// A validator only borrows immutable state, so it can be shared freely
// between threads. These assertions keep that true if the fields change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Validator<'static>>();
    assert_sync::<Validator<'static>>();
};
