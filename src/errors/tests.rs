//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Diagnostic, Error, ErrorImpl, ErrorTip, Severity};
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "`".to_string(),
        },
        Position(10, Rc::new("test.php".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_position() {
    let pos = Position(42, Rc::new("test.php".to_string()));
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "{".to_string(),
            expected: "class name".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position().1.as_str(), "test.php");
}

#[test]
fn test_unreadable_file_error() {
    let error = Error::new(
        ErrorImpl::UnreadableFile {
            path: "missing.php".to_string(),
            reason: "No such file or directory".to_string(),
        },
        Position(0, Rc::new("missing.php".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnreadableFile");
    assert!(error.is_fatal());
    assert!(error.to_string().contains("missing.php"));
}

#[test]
fn test_validation_error_carries_output() {
    let error = Error::new(
        ErrorImpl::ValidationFailed {
            output: vec![
                "PHP Parse error: syntax error".to_string(),
                "Errors parsing broken.php".to_string(),
            ],
        },
        Position(0, Rc::new("broken.php".to_string())),
    );

    assert_eq!(error.get_error_name(), "ValidationFailed");
    assert!(error.is_fatal());
    assert!(error
        .to_string()
        .contains("PHP Parse error: syntax error\nErrors parsing broken.php"));
}

#[test]
fn test_docblock_error_is_recoverable() {
    let error = Error::new(
        ErrorImpl::DocBlockParse {
            message: "missing `/**`".to_string(),
        },
        Position(3, Rc::new("test.php".to_string())),
    );

    assert_eq!(error.get_error_name(), "DocBlockParse");
    assert!(!error.is_fatal());
}

#[test]
fn test_unexpected_end_of_stream_error() {
    let error = Error::new(
        ErrorImpl::UnexpectedEndOfStream {
            expected: "`}`".to_string(),
        },
        Position(0, Rc::new("test.php".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnexpectedEndOfStream");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "`".to_string(),
        },
        Position(0, Rc::new("test.php".to_string())),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
            expected: "function name".to_string(),
        },
        Position(0, Rc::new("test.php".to_string())),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("function name")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_diagnostic_creation() {
    let diagnostic = Diagnostic::new(Severity::Error, "No page-level DocBlock", 1);

    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.message, "No page-level DocBlock");
    assert_eq!(Severity::Critical.to_string(), "critical");
}
