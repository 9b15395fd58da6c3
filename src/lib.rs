//! # Bouncer
//!
//! Structural conformance checking of decoded JSON values against an IDL
//! contract: structs with single inheritance, closed string enums,
//! arrays, string-keyed maps, and the four primitive types.
//!
//! ## Overview
//!
//! A [`Schema`] holds the struct and enum definitions an IDL compiler
//! emitted. Validation walks a [`serde_json::Value`] alongside a
//! [`TypeRef`] and reports the first point of nonconformance as a
//! [`ValidationError`] carrying the exact [`ValuePath`] into the value.
//! Values are never mutated and never coerced; validation only answers
//! whether the value already has the declared shape.
//!
//! ## Core Types
//!
//! - [`Schema`]: the contract, loaded from the compiler's JSON document or built in code
//! - [`TypeRef`]: a declared type (`builtIn`, `array`, `mapValue`, `userDefined`)
//! - [`Validator`]: a configured validation pass, optionally backed by a [`FieldCache`]
//! - [`ValidationError`]: one failure with kind, path and message
//! - [`ValuePath`]: the location of a failure, e.g. `users[0].email`
//!
//! ## Example
//!
//! ```rust
//! use bouncer::{validate_named, EnumDef, Schema, StructDef, TypeRef};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .with_struct(
//!         StructDef::new("Book")
//!             .field("title", TypeRef::string())
//!             .field("platform", TypeRef::user_defined("Platform"))
//!             .optional("pages", TypeRef::int()),
//!     )
//!     .with_enum(EnumDef::new("Platform", ["kindle", "nook"]));
//!
//! let book = json!({"title": "Rust", "platform": "kindle"});
//! assert!(validate_named(&book, "Book", &schema).is_ok());
//!
//! let wrong = json!({"title": "Rust", "platform": "kobo"});
//! let err = validate_named(&wrong, "Book", &schema).unwrap_err();
//! assert_eq!(err.path.to_string(), "platform");
//! ```

pub mod error;
pub mod path;
pub mod resolve;
pub mod rpc;
pub mod schema;
pub mod validation;

pub use error::{ErrorKind, ValidationError};
pub use path::{PathSegment, ValuePath};
pub use resolve::{resolve_struct_fields, FieldCache};
pub use rpc::{validate_params, validate_result, MethodDef, ParamDef, RpcError};
pub use schema::{
    BuiltinKind, EnumDef, FieldDef, IntegrityErrors, Schema, SchemaIntegrityError, StructDef,
    TypeRef,
};
pub use validation::{validate_named, validate_type, Validator, DEFAULT_MAX_DEPTH};

/// Type alias for the outcome of a validation pass.
pub type ValidationResult = std::result::Result<(), ValidationError>;
