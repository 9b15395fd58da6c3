//! Integration tests for error types and their rendering.

use bouncer::{
    ErrorKind, IntegrityErrors, RpcError, Schema, StructDef, ValidationError, ValuePath,
};

#[test]
fn test_validation_error_full_context() {
    let error = ValidationError::new(
        ErrorKind::TypeMismatch,
        ValuePath::root().push_field("email"),
        "expected string, got int",
    )
    .with_expected("string")
    .with_got("int");

    assert_eq!(error.kind, ErrorKind::TypeMismatch);
    assert_eq!(error.path.to_string(), "email");
    assert_eq!(error.message, "expected string, got int");
    assert_eq!(error.expected, Some("string".to_string()));
    assert_eq!(error.got, Some("int".to_string()));
}

#[test]
fn test_display_includes_path_and_detail() {
    let error = ValidationError::new(
        ErrorKind::TypeMismatch,
        ValuePath::root().push_field("users").push_index(2),
        "expected int, got string",
    )
    .with_expected("int")
    .with_got("string");

    assert_eq!(
        error.to_string(),
        "users[2]: expected int, got string (expected: int) (got: string)"
    );
}

#[test]
fn test_display_at_root_uses_placeholder() {
    let error = ValidationError::new(
        ErrorKind::NullNotAllowed,
        ValuePath::root(),
        "value cannot be null for non-optional type",
    );

    assert_eq!(
        error.to_string(),
        "(root): value cannot be null for non-optional type"
    );
}

#[test]
fn test_kind_codes_are_stable() {
    let cases = [
        (ErrorKind::TypeMismatch, "type_mismatch"),
        (ErrorKind::MissingRequiredField, "missing_required_field"),
        (ErrorKind::NullNotAllowed, "null_not_allowed"),
        (ErrorKind::InvalidEnumValue, "invalid_enum_value"),
        (ErrorKind::UnknownType, "unknown_type"),
        (ErrorKind::DepthLimitExceeded, "depth_limit_exceeded"),
    ];
    for (kind, code) in cases {
        assert_eq!(kind.code(), code);
        assert_eq!(kind.to_string(), code);
    }
}

#[test]
fn test_only_unknown_type_is_a_schema_error() {
    let schema_err =
        ValidationError::new(ErrorKind::UnknownType, ValuePath::root(), "unknown type");
    assert!(schema_err.is_schema_error());

    let value_err = ValidationError::new(
        ErrorKind::MissingRequiredField,
        ValuePath::root().push_field("id"),
        "missing required field",
    );
    assert!(!value_err.is_schema_error());
}

#[test]
fn test_errors_work_as_trait_objects() {
    let boxed: Box<dyn std::error::Error> = Box::new(ValidationError::new(
        ErrorKind::TypeMismatch,
        ValuePath::root().push_field("id"),
        "expected int, got bool",
    ));
    assert!(boxed.to_string().starts_with("id: "));

    let boxed: Box<dyn std::error::Error> = Box::new(RpcError::new(-32601, "Method not found"));
    assert_eq!(boxed.to_string(), "RPCError -32601: Method not found");
}

#[test]
fn test_integrity_errors_render_as_numbered_report() {
    let schema = Schema::new()
        .with_struct(StructDef::new("A").extends("Gone"))
        .with_struct(StructDef::new("B").extends("B"));

    let errors: IntegrityErrors = schema.check().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(!errors.is_empty());

    let report = errors.to_string();
    assert!(report.starts_with("Integrity check failed with 2 error(s):"));
    assert!(report.contains("1. struct 'A' extends unknown struct 'Gone'"));
    assert!(report.contains("2. circular extends chain: B -> B"));
}

#[test]
fn test_integrity_errors_iterate_in_discovery_order() {
    let schema = Schema::new()
        .with_struct(StructDef::new("2bad"))
        .with_struct(StructDef::new("A").extends("Gone"));

    let errors = schema.check().unwrap_err();
    let rendered: Vec<String> = (&errors).into_iter().map(|e| e.to_string()).collect();
    assert_eq!(rendered[0], "invalid type name '2bad'");
    assert_eq!(rendered[1], "struct 'A' extends unknown struct 'Gone'");

    let owned: Vec<_> = errors.into_iter().collect();
    assert_eq!(owned.len(), 2);
}
