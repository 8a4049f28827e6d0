//! Unit tests for registry error types.

use std::path::PathBuf;
use std::sync::Arc;

use rstest::rstest;

use super::*;

#[test]
fn duplicate_type_message_includes_name() {
    let error = RegistryError::DuplicateType {
        name: "IntSequence1".into(),
    };
    let message = error.to_string();
    assert!(
        message.contains("IntSequence1"),
        "expected name in message: {message}"
    );
    assert!(
        message.contains("already registered"),
        "expected 'already registered' in message: {message}"
    );
}

#[test]
fn conflicting_binding_message_names_both_formats() {
    let error = RegistryError::ConflictingBinding {
        type_expr: "Kennel[Dog]".into(),
        existing: "MappingDirectoryFormat".into(),
        requested: "IntSequenceDirectoryFormat".into(),
    };
    let message = error.to_string();
    assert!(message.contains("Kennel[Dog]"), "message: {message}");
    assert!(message.contains("MappingDirectoryFormat"), "message: {message}");
    assert!(
        message.contains("IntSequenceDirectoryFormat"),
        "message: {message}"
    );
}

#[rstest]
#[case::arity(
    RegistryError::ArityMismatch {
        action: "concatenate_ints".into(),
        expected: 5,
        actual: 3,
    },
    "5"
)]
#[case::arity_actual(
    RegistryError::ArityMismatch {
        action: "concatenate_ints".into(),
        expected: 5,
        actual: 3,
    },
    "3"
)]
fn arity_message_includes_counts(#[case] error: RegistryError, #[case] expected_value: &str) {
    let message = error.to_string();
    assert!(
        message.contains(expected_value),
        "expected '{expected_value}' in message: {message}"
    );
}

#[test]
fn document_io_exposes_source() {
    let error = RegistryError::DocumentIo {
        path: PathBuf::from("/nonexistent/plugin.yaml"),
        source: Arc::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        )),
    };
    let source = std::error::Error::source(&error);
    assert!(source.is_some(), "I/O errors should expose their source");
    assert!(error.to_string().contains("/nonexistent/plugin.yaml"));
}

#[test]
fn action_failure_displays_message() {
    let failure = ActionFailure::new("Bad mapping");
    assert_eq!(failure.to_string(), "Bad mapping");
    assert_eq!(failure.message(), "Bad mapping");
}
