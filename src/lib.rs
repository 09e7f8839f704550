#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod loader;
pub mod macros;
pub mod parser;
pub mod xml;

extern crate regex;

/// A 1-based line in a named file. Line `0` means "no particular line".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

/// Returns the text of a 1-based line.
pub fn get_line(source: &str, line: u32) -> Option<&str> {
    let index = (line as usize).checked_sub(1)?;
    source.split('\n').nth(index).map(|text| text.trim_end_matches('\r'))
}

/// Formats an error for the terminal, quoting the offending line when the
/// source is at hand.
pub fn render_error(error: &Error, source: Option<&str>) -> String {
    /*
        Error: UnexpectedToken (Unexpected token: `)`, expected function name)
        -> src/foo.php
           |
        20 | function ) {}
           |
    */

    let position = error.get_position();
    let mut output = match error.get_tip() {
        ErrorTip::None => format!("Error: {}\n", error.get_error_name()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };
    output.push_str(&format!("-> {}\n", position.1));

    let line_text = source.and_then(|source| get_line(source, position.0));
    match line_text {
        Some(text) => {
            let line_string = position.0.to_string();
            let padding = line_string.len() + 2;

            output.push_str(&format!("{:>padding$}\n", "|"));
            output.push_str(&format!("{} | {}\n", line_string, text.trim()));
            output.push_str(&format!("{:>padding$}", "|"));
        }
        None => output.push_str(&error.get_kind().to_string()),
    }

    output
}

pub fn display_error(error: &Error, source: Option<&str>) {
    eprintln!("{}", render_error(error, source));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::errors::ErrorImpl;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_line() {
        let source = "<?php\r\nclass Foo {}\n\n$a = 1;";

        assert_eq!(get_line(source, 1), Some("<?php"));
        assert_eq!(get_line(source, 2), Some("class Foo {}"));
        assert_eq!(get_line(source, 3), Some(""));
        assert_eq!(get_line(source, 4), Some("$a = 1;"));
        assert_eq!(get_line(source, 0), None);
        assert_eq!(get_line(source, 5), None);
    }

    #[test]
    fn test_render_error_quotes_line() {
        let error = Error::new(
            ErrorImpl::UnexpectedEndOfStream {
                expected: "`)`".to_string(),
            },
            Position(2, Rc::new("foo.php".to_string())),
        );

        assert_eq!(
            render_error(&error, Some("<?php\n  function broken(")),
            "Error: UnexpectedEndOfStream (The file ended while looking for `)`)\n-> foo.php\n  |\n2 | function broken(\n  |"
        );
    }

    #[test]
    fn test_render_error_without_source() {
        let error = Error::new(
            ErrorImpl::UnrecognisedToken {
                token: "\u{1}".to_string(),
            },
            Position(0, Rc::new("foo.php".to_string())),
        );

        assert_eq!(
            render_error(&error, None),
            "Error: UnrecognisedToken\n-> foo.php\nunrecognised token: \"\\u{1}\""
        );
    }
}
