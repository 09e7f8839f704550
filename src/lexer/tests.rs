//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Punctuation, which is left untyped
//! - Comments and docblocks
//! - Inline HTML and open/close tags
//! - Line tracking
//! - Error cases

use super::{lexer::tokenize, tokens::{Token, TokenKind}};

fn significant(tokens: &[Token]) -> Vec<&Token> {
    tokens.iter().filter(|token| !token.is(TokenKind::Whitespace)).collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "<?php namespace use class interface function const require require_once include include_once extends implements abstract final";
    let tokens = tokenize(source, Some("test.php".to_string())).unwrap();
    let tokens = significant(&tokens);

    assert!(tokens[0].is(TokenKind::OpenTag));
    assert!(tokens[1].is(TokenKind::Namespace));
    assert!(tokens[2].is(TokenKind::Use));
    assert!(tokens[3].is(TokenKind::Class));
    assert!(tokens[4].is(TokenKind::Interface));
    assert!(tokens[5].is(TokenKind::Function));
    assert!(tokens[6].is(TokenKind::Const));
    assert!(tokens[7].is(TokenKind::Require));
    assert!(tokens[8].is(TokenKind::RequireOnce));
    assert!(tokens[9].is(TokenKind::Include));
    assert!(tokens[10].is(TokenKind::IncludeOnce));
    assert!(tokens[11].is(TokenKind::Extends));
    assert!(tokens[12].is(TokenKind::Implements));
    assert!(tokens[13].is(TokenKind::Abstract));
    assert!(tokens[14].is(TokenKind::Final));
    assert_eq!(tokens.len(), 15);
}

#[test]
fn test_keywords_are_case_insensitive() {
    let tokens = tokenize("<?php CLASS Foo", None).unwrap();
    let tokens = significant(&tokens);

    assert!(tokens[1].is(TokenKind::Class));
    assert_eq!(tokens[1].value, "CLASS");
}

#[test]
fn test_tokenize_identifiers_and_namespaces() {
    let tokens = tokenize("<?php Foo\\Bar_1 $baz", None).unwrap();
    let tokens = significant(&tokens);

    assert!(tokens[1].is(TokenKind::String));
    assert_eq!(tokens[1].value, "Foo");
    assert!(tokens[2].is(TokenKind::NsSeparator));
    assert!(tokens[3].is(TokenKind::String));
    assert_eq!(tokens[3].value, "Bar_1");
    assert!(tokens[4].is(TokenKind::Variable));
    assert_eq!(tokens[4].value, "$baz");
}

#[test]
fn test_punctuation_is_untyped() {
    let tokens = tokenize("<?php ;{},()=", None).unwrap();
    let tokens = significant(&tokens);

    let values: Vec<&str> = tokens[1..].iter().map(|token| token.value.as_str()).collect();
    assert_eq!(values, vec![";", "{", "}", ",", "(", ")", "="]);
    assert!(tokens[1..].iter().all(|token| token.kind.is_none()));
}

#[test]
fn test_tokenize_operators() {
    let tokens = tokenize("<?php => -> :: === ... .=", None).unwrap();
    let tokens = significant(&tokens);

    assert!(tokens[1].is(TokenKind::DoubleArrow));
    assert!(tokens[2].is(TokenKind::ObjectOperator));
    assert!(tokens[3].is(TokenKind::DoubleColon));
    assert!(tokens[4].is(TokenKind::IsIdentical));
    assert!(tokens[5].is(TokenKind::Ellipsis));
    assert!(tokens[6].is(TokenKind::AssignOp));
}

#[test]
fn test_member_names_are_not_keywords() {
    let tokens = tokenize("<?php $this->class; Foo::function", None).unwrap();
    let tokens = significant(&tokens);

    assert!(tokens[3].is(TokenKind::String));
    assert_eq!(tokens[3].value, "class");
    assert!(tokens[7].is(TokenKind::String));
}

#[test]
fn test_tokenize_numbers_and_strings() {
    let tokens = tokenize("<?php 42 3.14 0x1F 'it\\'s' \"a \\\"b\\\"\"", None).unwrap();
    let tokens = significant(&tokens);

    assert!(tokens[1].is(TokenKind::LNumber));
    assert!(tokens[2].is(TokenKind::DNumber));
    assert!(tokens[3].is(TokenKind::LNumber));
    assert!(tokens[4].is(TokenKind::ConstantEncapsedString));
    assert_eq!(tokens[4].value, "'it\\'s'");
    assert!(tokens[5].is(TokenKind::ConstantEncapsedString));
}

#[test]
fn test_tokenize_comments() {
    let source = "<?php\n/**\n * Doc\n */\n// line\n# hash\n/* block */";
    let tokens = tokenize(source, None).unwrap();
    let tokens = significant(&tokens);

    assert!(tokens[1].is(TokenKind::DocComment));
    assert_eq!(tokens[1].value, "/**\n * Doc\n */");
    assert!(tokens[2].is(TokenKind::Comment));
    assert_eq!(tokens[2].value, "// line");
    assert!(tokens[3].is(TokenKind::Comment));
    assert!(tokens[4].is(TokenKind::Comment));
    assert_eq!(tokens[4].value, "/* block */");
}

#[test]
fn test_tokenize_heredoc() {
    let source = "<?php $a = <<<EOT\nclass Foo {}\nEOT;\n";
    let tokens = tokenize(source, None).unwrap();
    let tokens = significant(&tokens);

    assert!(tokens[3].is(TokenKind::ConstantEncapsedString));
    assert_eq!(tokens[3].value, "<<<EOT\nclass Foo {}\nEOT");
    assert!(tokens[4].is_punct(";"));
}

#[test]
fn test_inline_html_and_tags() {
    let source = "<html>\n<?php echo 1; ?>\n</html>";
    let tokens = tokenize(source, None).unwrap();

    assert!(tokens[0].is(TokenKind::InlineHtml));
    assert_eq!(tokens[0].value, "<html>\n");
    assert!(tokens[1].is(TokenKind::OpenTag));
    assert_eq!(tokens[1].value, "<?php ");
    let close = tokens.iter().position(|token| token.is(TokenKind::CloseTag)).unwrap();
    assert_eq!(tokens[close].value, "?>\n");
    assert!(tokens[close + 1].is(TokenKind::InlineHtml));
    assert_eq!(tokens[close + 1].value, "</html>");
}

#[test]
fn test_file_without_open_tag_is_html() {
    let tokens = tokenize("class Foo {}", None).unwrap();

    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is(TokenKind::InlineHtml));
}

#[test]
fn test_line_numbers() {
    let source = "<?php\n\nclass Foo\n{\n}\n";
    let tokens = tokenize(source, None).unwrap();
    let tokens = significant(&tokens);

    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].line, 3);
    assert_eq!(tokens[2].line, 3);
    assert_eq!(tokens[3].line, 4);
    assert_eq!(tokens[4].line, 5);
}

#[test]
fn test_unterminated_docblock_reaches_end_of_file() {
    let tokens = tokenize("<?php /** never closed", None).unwrap();
    let last = tokens.last().unwrap();

    assert!(last.is(TokenKind::DocComment));
    assert_eq!(last.value, "/** never closed");
}

#[test]
fn test_unrecognised_token() {
    let result = tokenize("<?php 'unterminated", Some("test.php".to_string()));
    let error = result.err().unwrap();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 1);
}

#[test]
fn test_line_comment_ends_at_close_tag() {
    let tokens = tokenize("<?php // note ?>\n<p>Don't panic</p><?php # again ?>x", None).unwrap();

    assert!(tokens[1].is(TokenKind::Comment));
    assert_eq!(tokens[1].value, "// note ");
    assert!(tokens[2].is(TokenKind::CloseTag));
    assert!(tokens[3].is(TokenKind::InlineHtml));
    assert_eq!(tokens[3].value, "<p>Don't panic</p>");

    let hash = tokens.iter().rposition(|token| token.is(TokenKind::Comment)).unwrap();
    assert_eq!(tokens[hash].value, "# again ");
    assert!(tokens[hash + 1].is(TokenKind::CloseTag));
}

#[test]
fn test_declaration_keywords() {
    let tokens = tokenize("<?php trait enum readonly", None).unwrap();
    let tokens = significant(&tokens);

    assert!(tokens[1].is(TokenKind::Trait));
    assert!(tokens[2].is(TokenKind::Enum));
    assert!(tokens[3].is(TokenKind::Readonly));
}

#[test]
fn test_named_arguments_are_not_keywords() {
    let tokens = tokenize("<?php foo(class: 1, array : [], static::X); $a ? new Foo : null;", None).unwrap();
    let tokens = significant(&tokens);

    let class = tokens.iter().find(|token| token.value == "class").unwrap();
    assert!(class.is(TokenKind::String));
    let array = tokens.iter().find(|token| token.value == "array").unwrap();
    assert!(array.is(TokenKind::String));
    let keyword = tokens.iter().find(|token| token.value == "static").unwrap();
    assert!(keyword.is(TokenKind::Static));
    let new = tokens.iter().find(|token| token.value == "new").unwrap();
    assert!(new.is(TokenKind::New));
}
