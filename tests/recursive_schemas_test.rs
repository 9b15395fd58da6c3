//! Tests for recursive type definitions and depth tracking.

use bouncer::{ErrorKind, Schema, StructDef, TypeRef, Validator};
use serde_json::{json, Value};

fn comment_schema() -> Schema {
    Schema::new().with_struct(
        StructDef::new("Comment")
            .field("text", TypeRef::string())
            .optional("replies", TypeRef::array(TypeRef::user_defined("Comment"))),
    )
}

#[test]
fn test_self_referencing_struct() {
    let schema = comment_schema();

    let thread = json!({
        "text": "Top comment",
        "replies": [
            {"text": "Reply 1"},
            {"text": "Reply 2", "replies": [
                {"text": "Nested reply"}
            ]}
        ]
    });

    assert!(bouncer::validate_named(&thread, "Comment", &schema).is_ok());
}

#[test]
fn test_failure_deep_in_recursive_value_keeps_full_path() {
    let schema = comment_schema();

    let thread = json!({
        "text": "Top",
        "replies": [
            {"text": "ok"},
            {"text": "ok", "replies": [{"text": 42}]}
        ]
    });

    let err = bouncer::validate_named(&thread, "Comment", &schema).unwrap_err();
    assert_eq!(err.path.to_string(), "replies[1].replies[0].text");
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
}

#[test]
fn test_mutually_recursive_structs() {
    let schema = Schema::new()
        .with_struct(
            StructDef::new("Author")
                .field("name", TypeRef::string())
                .optional("posts", TypeRef::array(TypeRef::user_defined("Post"))),
        )
        .with_struct(
            StructDef::new("Post")
                .field("title", TypeRef::string())
                .optional("author", TypeRef::user_defined("Author")),
        );

    let value = json!({
        "name": "ada",
        "posts": [
            {"title": "first", "author": {"name": "ada"}}
        ]
    });

    assert!(bouncer::validate_named(&value, "Author", &schema).is_ok());
}

fn nested_comment(levels: usize) -> Value {
    let mut value = json!({"text": "leaf"});
    for _ in 0..levels {
        value = json!({"text": "node", "replies": [value]});
    }
    value
}

#[test]
fn test_deep_value_within_default_limit() {
    let schema = comment_schema();
    let value = nested_comment(50);
    assert!(bouncer::validate_named(&value, "Comment", &schema).is_ok());
}

#[test]
fn test_depth_limit_stops_runaway_nesting() {
    let schema = comment_schema();
    let value = nested_comment(200);

    let err = bouncer::validate_named(&value, "Comment", &schema).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthLimitExceeded);
    assert!(err.message.contains("maximum reference depth 100"));
}

#[test]
fn test_configured_depth_limit_is_respected() {
    let schema = comment_schema();
    let validator = Validator::new(&schema).with_max_depth(3);

    assert!(validator.validate_named(&nested_comment(2), "Comment").is_ok());

    let err = validator
        .validate_named(&nested_comment(5), "Comment")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthLimitExceeded);
}

#[test]
fn test_depth_counts_named_hops_not_containers() {
    // 60 levels of array nesting around a plain int stays well under a
    // named-hop limit of 2.
    let schema = Schema::new();
    let mut ty = TypeRef::int();
    let mut value = json!(7);
    for _ in 0..60 {
        ty = TypeRef::array(ty);
        value = json!([value]);
    }

    let validator = Validator::new(&schema).with_max_depth(2);
    assert!(validator.validate(&value, &ty, false).is_ok());
}

#[test]
fn test_cyclic_extends_does_not_hang_validation() {
    // The cycle is a schema defect; lenient validation still terminates,
    // treating the loop like a truncated parent chain.
    let schema = Schema::new()
        .with_struct(StructDef::new("A").extends("B").field("a", TypeRef::int()))
        .with_struct(StructDef::new("B").extends("A").field("b", TypeRef::int()));

    assert!(bouncer::validate_named(&json!({"a": 1, "b": 2}), "A", &schema).is_ok());
    assert!(bouncer::validate_named(&json!({"a": 1}), "A", &schema).is_err());

    assert!(schema.check().is_err());
}
