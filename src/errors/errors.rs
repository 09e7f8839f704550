use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Fatal errors abort processing of the whole file.
    pub fn is_fatal(&self) -> bool {
        !matches!(self.internal_error, ErrorImpl::DocBlockParse { .. })
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnreadableFile { .. } => "UnreadableFile",
            ErrorImpl::ValidationFailed { .. } => "ValidationFailed",
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedEndOfStream { .. } => "UnexpectedEndOfStream",
            ErrorImpl::DocBlockParse { .. } => "DocBlockParse",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnreadableFile { path, .. } => ErrorTip::Suggestion(format!(
                "`{}` should exist on the filesystem and be readable",
                path
            )),
            ErrorImpl::ValidationFailed { .. } => ErrorTip::Suggestion(String::from(
                "The file contains syntax errors, fix them or run without validation",
            )),
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token, expected } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, expected {}",
                token, expected
            )),
            ErrorImpl::UnexpectedEndOfStream { expected } => ErrorTip::Suggestion(format!(
                "The file ended while looking for {}",
                expected
            )),
            ErrorImpl::DocBlockParse { .. } => ErrorTip::Suggestion(String::from(
                "DocBlocks start with `/**` and end with `*/`",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}:{})", self.internal_error, self.position.1, self.position.0)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("file {path:?} could not be read: {reason}")]
    UnreadableFile { path: String, reason: String },
    #[error("file could not be interpreted as it contains errors: {}", .output.join("\n"))]
    ValidationFailed { output: Vec<String> },
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token {token:?}, expected {expected}")]
    UnexpectedToken { token: String, expected: String },
    #[error("unexpected end of stream, expected {expected}")]
    UnexpectedEndOfStream { expected: String },
    #[error("unable to parse docblock: {message}")]
    DocBlockParse { message: String },
}

/// How serious a recorded, non-fatal condition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A condition that was absorbed while processing a file.
///
/// Diagnostics never interrupt the token pass; they are kept on the
/// [`SourceFile`](crate::parser::file::SourceFile) so callers can inspect them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: u32,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, line: u32) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            line,
        }
    }
}
