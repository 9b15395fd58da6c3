//! Validation error type.
//!
//! This module provides [`ValidationError`] for conformance failures and
//! [`ErrorKind`] for distinguishing the failure classes programmatically.

use std::fmt::{self, Display};

use crate::path::ValuePath;

/// The class of a validation failure.
///
/// Most kinds describe a defect in the *value* being validated. The one
/// exception is [`ErrorKind::UnknownType`], which signals an inconsistency
/// in the schema itself: a user-defined type reference that resolves to
/// neither a struct nor an enum. Callers that need to tell "bad input"
/// apart from "bad contract" can branch on
/// [`ValidationError::is_schema_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The value's runtime shape does not match the expected kind.
    TypeMismatch,
    /// A non-optional struct field is absent from the value.
    MissingRequiredField,
    /// A null value where optionality is false.
    NullNotAllowed,
    /// A string value not among an enum's declared values.
    InvalidEnumValue,
    /// A user-defined type name that is neither a struct nor an enum.
    UnknownType,
    /// Named-type resolution exceeded the configured depth limit.
    DepthLimitExceeded,
}

impl ErrorKind {
    /// Returns the stable snake_case code for this kind, suitable for
    /// wire payloads and log matching.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::MissingRequiredField => "missing_required_field",
            ErrorKind::NullNotAllowed => "null_not_allowed",
            ErrorKind::InvalidEnumValue => "invalid_enum_value",
            ErrorKind::UnknownType => "unknown_type",
            ErrorKind::DepthLimitExceeded => "depth_limit_exceeded",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single validation failure with full context.
///
/// `ValidationError` captures everything the RPC boundary needs to report a
/// rejected payload:
/// - **kind**: which failure class occurred
/// - **path**: where in the value the failure was detected
/// - **message**: human-readable description
/// - **expected** / **got**: the shapes involved, when known
///
/// The path is accreted on the way *down* the recursive walk, so the error
/// constructed at the failing leaf already names the full route from the
/// validated root, e.g. `order.items[2].sku`.
///
/// # Example
///
/// ```rust
/// use bouncer::{ErrorKind, ValidationError, ValuePath};
///
/// let error = ValidationError::new(
///     ErrorKind::TypeMismatch,
///     ValuePath::root().push_field("age"),
///     "expected int, got string",
/// )
/// .with_expected("int")
/// .with_got("string");
///
/// assert_eq!(error.kind, ErrorKind::TypeMismatch);
/// assert_eq!(error.to_string(), "age: expected int, got string (expected: int) (got: string)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The failure class.
    pub kind: ErrorKind,
    /// The path to the value that failed validation.
    pub path: ValuePath,
    /// Human-readable error message.
    pub message: String,
    /// Description of what was expected.
    pub expected: Option<String>,
    /// The shape that was actually received.
    pub got: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error with the given kind, path, and message.
    pub fn new(kind: ErrorKind, path: ValuePath, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
            expected: None,
            got: None,
        }
    }

    /// Sets the "expected" field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Sets the "got" (actual shape) field and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Returns true if this error indicates a defect in the schema rather
    /// than in the validated value.
    pub fn is_schema_error(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownType)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ValidationError is Send + Sync since all fields are owned types. These
// assertions keep that true if the fields change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ValidationError::new(
            ErrorKind::MissingRequiredField,
            ValuePath::root().push_field("name"),
            "missing required field 'name' in struct 'User'",
        );

        assert_eq!(error.kind, ErrorKind::MissingRequiredField);
        assert_eq!(error.path, ValuePath::root().push_field("name"));
        assert!(error.expected.is_none());
        assert!(error.got.is_none());
    }

    #[test]
    fn test_error_builder() {
        let error = ValidationError::new(
            ErrorKind::TypeMismatch,
            ValuePath::root().push_field("age"),
            "expected int, got string",
        )
        .with_expected("int")
        .with_got("string");

        assert_eq!(error.expected, Some("int".to_string()));
        assert_eq!(error.got, Some("string".to_string()));
    }

    #[test]
    fn test_error_display() {
        let error = ValidationError::new(
            ErrorKind::TypeMismatch,
            ValuePath::root().push_field("email"),
            "expected string, got int",
        )
        .with_expected("string")
        .with_got("int");

        let display = error.to_string();
        assert!(display.contains("email: expected string, got int"));
        assert!(display.contains("expected: string"));
        assert!(display.contains("got: int"));
    }

    #[test]
    fn test_error_display_root() {
        let error = ValidationError::new(
            ErrorKind::NullNotAllowed,
            ValuePath::root(),
            "value cannot be null for non-optional type",
        );
        let display = error.to_string();
        assert!(display.contains("(root): value cannot be null"));
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(ErrorKind::TypeMismatch.code(), "type_mismatch");
        assert_eq!(
            ErrorKind::MissingRequiredField.code(),
            "missing_required_field"
        );
        assert_eq!(ErrorKind::NullNotAllowed.code(), "null_not_allowed");
        assert_eq!(ErrorKind::InvalidEnumValue.code(), "invalid_enum_value");
        assert_eq!(ErrorKind::UnknownType.code(), "unknown_type");
        assert_eq!(ErrorKind::DepthLimitExceeded.code(), "depth_limit_exceeded");
    }

    #[test]
    fn test_schema_error_classification() {
        let schema_err = ValidationError::new(
            ErrorKind::UnknownType,
            ValuePath::root(),
            "unknown user-defined type 'Ghost'",
        );
        assert!(schema_err.is_schema_error());

        let value_err = ValidationError::new(
            ErrorKind::TypeMismatch,
            ValuePath::root(),
            "expected bool, got string",
        );
        assert!(!value_err.is_schema_error());
    }
}
