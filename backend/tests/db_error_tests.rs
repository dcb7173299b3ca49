//! Tests for db::repository::error.

use study_planner::db::repository::{ErrorContext, RepositoryError};

#[test]
fn test_error_context_chaining() {
    let ctx = ErrorContext::new("activate_plan")
        .with_entity("plan")
        .with_entity_id(42)
        .with_details("insert timed out")
        .retryable();

    assert_eq!(ctx.operation.as_deref(), Some("activate_plan"));
    assert_eq!(ctx.entity.as_deref(), Some("plan"));
    assert_eq!(ctx.entity_id.as_deref(), Some("42"));
    assert_eq!(
        ctx.to_string(),
        "[operation=activate_plan, entity=plan, id=42, details=insert timed out, retryable=true]"
    );
}

#[test]
fn test_retryable_kinds() {
    assert!(RepositoryError::connection("refused").is_retryable());
    assert!(RepositoryError::timeout("slow").is_retryable());
    assert!(!RepositoryError::query("bad filter").is_retryable());
    assert!(RepositoryError::query_with_context("503", ErrorContext::new("list_plans").retryable())
        .is_retryable());
    assert!(!RepositoryError::validation("pages must be positive").is_retryable());
    assert!(!RepositoryError::not_found("plan 3").is_retryable());
}

#[test]
fn test_with_operation_sets_context() {
    let err = RepositoryError::not_found("invite").with_operation("find_invite");
    assert!(err.is_not_found());
    assert_eq!(err.context().operation.as_deref(), Some("find_invite"));
    assert!(err.to_string().starts_with("not found: invite"));
}

#[test]
fn test_conversions() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: RepositoryError = json_err.into();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert_eq!(err.context().details.as_deref(), Some("row_shape"));
}

#[test]
fn test_internal_error_keeps_context() {
    let err = RepositoryError::internal_with_context(
        "Insert returned no row",
        ErrorContext::new("create_book").with_entity("books"),
    );
    assert!(matches!(err, RepositoryError::InternalError { .. }));
    assert!(!err.is_retryable());
    assert_eq!(
        err.to_string(),
        "internal error: Insert returned no row [operation=create_book, entity=books]"
    );
}

#[test]
fn test_empty_context_displays_brackets() {
    assert_eq!(ErrorContext::default().to_string(), "[]");
    assert_eq!(
        RepositoryError::timeout("slow").to_string(),
        "timed out: slow [retryable=true]"
    );
}
