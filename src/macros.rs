//! Utility macros for the reflector.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a lexer handler that emits the matched text
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The optional TokenKind (`None` for punctuation)
/// * `$value` - The token's literal text
/// * `$line` - The line the token starts on
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(Some(TokenKind::LNumber), "42".to_string(), 1);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $line:expr) => {
        Token {
            kind: $kind,
            value: $value,
            line: $line,
        }
    };
}

/// Creates a lexer handler that emits the whole match as one token.
///
/// Without arguments the token is untyped punctuation.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^=>").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::DoubleArrow),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    () => {
        |lexer: &mut Lexer, regex: &Regex| {
            let value = lexer.matched(regex);
            lexer.push(None, value);
        }
    };
    ($kind:expr) => {
        |lexer: &mut Lexer, regex: &Regex| {
            let value = lexer.matched(regex);
            lexer.push(Some($kind), value);
        }
    };
}
