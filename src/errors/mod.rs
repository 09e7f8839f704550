//! Error types and error handling for the reflector.
//!
//! This module defines the errors raised while loading and processing a
//! source file. It includes:
//!
//! - Error structures with source position information
//! - Fatal variants (unreadable file, failed validation, lexing and
//!   entity-parsing failures)
//! - The recoverable docblock parse failure
//! - Diagnostics recorded for conditions that never abort a parse

pub mod errors;

#[cfg(test)]
mod tests;
