//! Lexical analysis module for the reflector.
//!
//! This module contains the lexer (tokenizer) that converts PHP source
//! into the flat token sequence the file parser walks. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Inline HTML outside of `<?php ... ?>` sections
//! - Recognition of keywords, identifiers, literals and operators
//! - Line tracking for every token
//! - Comments and documentation comments, which are kept as tokens

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
