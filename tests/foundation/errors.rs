//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use cqlc_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unresolved_adjective() {
    let err = Error::unresolved_adjective("ugly", "Girl is going out with ugly-");
    assert!(matches!(err.kind, ErrorKind::UnresolvedAdjective { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("ugly"));
}

#[test]
fn error_unrecognized_player() {
    let err = Error::unrecognized_player("is going out with");
    assert!(matches!(err.kind, ErrorKind::UnrecognizedPlayer(_)));
    assert!(format!("{err}").contains("is going out with"));
}

#[test]
fn error_object_type_not_found() {
    let err = Error::object_type_not_found("Person");
    assert!(matches!(err.kind, ErrorKind::ObjectTypeNotFound(_)));
    assert!(format!("{err}").contains("Person"));
}

#[test]
fn error_forward_references_are_listed() {
    let err = Error::new(ErrorKind::UnresolvedForwardReference(vec![
        "Company".to_string(),
        "Person".to_string(),
    ]));
    assert_eq!(
        format!("{err}"),
        "unresolved forward references: Company, Person"
    );
}

#[test]
fn error_conflicting_frequency_names_both_bounds() {
    let err = Error::new(ErrorKind::ConflictingFrequency {
        roles: "Girl".to_string(),
        existing: "at most 1".to_string(),
        requested: "at most 2".to_string(),
    });
    let msg = format!("{err}");
    assert!(msg.contains("at most 1"));
    assert!(msg.contains("at most 2"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_index(3)
        .with_declaration("Person")
        .with_clause("Person has Name");
    assert_eq!(context.to_string(), "declaration 3 (Person): Person has Name");
}

#[test]
fn in_clause_keeps_the_innermost_clause() {
    let err = Error::malformed_clause("dangling quantifier")
        .in_clause("Girl likes at most one")
        .in_clause("outer");
    let context = err.context.unwrap();
    assert_eq!(context.clause.as_deref(), Some("Girl likes at most one"));
}

#[test]
fn in_declaration_keeps_existing_name() {
    let err = Error::internal("boom")
        .with_context(ErrorContext::new().with_declaration("First"))
        .in_declaration("Second");
    assert_eq!(err.context.unwrap().declaration.as_deref(), Some("First"));
}
