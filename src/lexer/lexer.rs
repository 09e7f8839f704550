use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{errors::errors::{Error, ErrorImpl}, Position, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

macro_rules! pattern {
    ($regex:literal, $handler:expr) => {
        RegexPattern { regex: Regex::new($regex).unwrap(), handler: $handler }
    };
}

lazy_static! {
    static ref OPEN_TAG: Regex = Regex::new(r"<\?php(?:\r\n|[ \t\r\n]|$)|<\?=").unwrap();

    /// Patterns tried in order while inside a `<?php ... ?>` section; every
    /// pattern is anchored at the start of the remaining input.
    static ref SCRIPT_PATTERNS: Vec<RegexPattern> = vec![
        pattern!(r"^\?>(?:\r?\n)?", close_tag_handler),
        pattern!(r"^/\*\*[ \t\r\n][\s\S]*?(?:\*/|$)", MK_DEFAULT_HANDLER!(TokenKind::DocComment)),
        pattern!(r"^/\*[\s\S]*?(?:\*/|$)", MK_DEFAULT_HANDLER!(TokenKind::Comment)),
        pattern!(r"^(?://|#)[^\r\n]*", line_comment_handler),
        pattern!(r"^\s+", MK_DEFAULT_HANDLER!(TokenKind::Whitespace)),
        pattern!(r#"^<<<[ \t]*["']?([A-Za-z_][A-Za-z0-9_]*)["']?\r?\n"#, heredoc_handler),
        pattern!(r"^\$[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*", MK_DEFAULT_HANDLER!(TokenKind::Variable)),
        pattern!(r"^[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*", symbol_handler),
        pattern!(r"^(?:[0-9]+\.[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?|^[0-9]+[eE][+-]?[0-9]+", MK_DEFAULT_HANDLER!(TokenKind::DNumber)),
        pattern!(r"^(?:0[xX][0-9a-fA-F]+|0[bB][01]+|[0-9]+)", MK_DEFAULT_HANDLER!(TokenKind::LNumber)),
        pattern!(r"^'(?:[^'\\]|\\[\s\S])*'", MK_DEFAULT_HANDLER!(TokenKind::ConstantEncapsedString)),
        pattern!(r#"^"(?:[^"\\]|\\[\s\S])*""#, MK_DEFAULT_HANDLER!(TokenKind::ConstantEncapsedString)),
        pattern!(r"^`(?:[^`\\]|\\[\s\S])*`", MK_DEFAULT_HANDLER!(TokenKind::ConstantEncapsedString)),
        pattern!(r"^===", MK_DEFAULT_HANDLER!(TokenKind::IsIdentical)),
        pattern!(r"^!==", MK_DEFAULT_HANDLER!(TokenKind::IsNotIdentical)),
        pattern!(r"^<=>", MK_DEFAULT_HANDLER!(TokenKind::Operator)),
        pattern!(r"^\.\.\.", MK_DEFAULT_HANDLER!(TokenKind::Ellipsis)),
        pattern!(r"^(?:\*\*=|<<=|>>=|\?\?=)", MK_DEFAULT_HANDLER!(TokenKind::AssignOp)),
        pattern!(r"^==", MK_DEFAULT_HANDLER!(TokenKind::IsEqual)),
        pattern!(r"^(?:!=|<>)", MK_DEFAULT_HANDLER!(TokenKind::IsNotEqual)),
        pattern!(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::IsSmallerOrEqual)),
        pattern!(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::IsGreaterOrEqual)),
        pattern!(r"^&&", MK_DEFAULT_HANDLER!(TokenKind::BooleanAnd)),
        pattern!(r"^\|\|", MK_DEFAULT_HANDLER!(TokenKind::BooleanOr)),
        pattern!(r"^\+\+", MK_DEFAULT_HANDLER!(TokenKind::Inc)),
        pattern!(r"^--", MK_DEFAULT_HANDLER!(TokenKind::Dec)),
        pattern!(r"^=>", MK_DEFAULT_HANDLER!(TokenKind::DoubleArrow)),
        pattern!(r"^->", MK_DEFAULT_HANDLER!(TokenKind::ObjectOperator)),
        pattern!(r"^::", MK_DEFAULT_HANDLER!(TokenKind::DoubleColon)),
        pattern!(r"^[+\-*/.%&|^]=", MK_DEFAULT_HANDLER!(TokenKind::AssignOp)),
        pattern!(r"^(?:<<|>>|\*\*|\?\?)", MK_DEFAULT_HANDLER!(TokenKind::Operator)),
        pattern!(r"^\\", MK_DEFAULT_HANDLER!(TokenKind::NsSeparator)),
        pattern!(r"^[;{}(),=\[\].+\-*/<>!?:&|^%@~$]", MK_DEFAULT_HANDLER!()),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    file: Rc<String>,
    in_script: bool,
}

impl Lexer {
    pub fn new(source: &str, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            tokens: vec![],
            source: source.to_string(),
            pos: 0,
            line: 1,
            file: file_name,
            in_script: false,
        }
    }

    /// Emits a token for the next `value.len()` bytes of input.
    pub fn push(&mut self, kind: Option<TokenKind>, value: String) {
        let line = self.line;
        self.line += value.matches('\n').count() as u32;
        self.pos += value.len();
        self.tokens.push(MK_TOKEN!(kind, value, line));
    }

    /// The text `regex` matches at the start of the remaining input.
    pub fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|found| found.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or_default()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// The last token that is not whitespace or a comment.
    fn last_significant(&self) -> Option<&Token> {
        self.tokens.iter().rev().find(|token| !token.is_trivia())
    }

    /// Consumes everything up to the next open tag as inline HTML.
    fn scan_inline_html(&mut self) {
        let remainder = self.remainder();
        match OPEN_TAG.find(remainder) {
            Some(tag) => {
                let html = remainder[..tag.start()].to_string();
                let kind = if tag.as_str() == "<?=" {
                    TokenKind::OpenTagWithEcho
                } else {
                    TokenKind::OpenTag
                };
                let tag = tag.as_str().to_string();

                if !html.is_empty() {
                    self.push(Some(TokenKind::InlineHtml), html);
                }
                self.push(Some(kind), tag);
                self.in_script = true;
            }
            None => {
                let html = remainder.to_string();
                self.push(Some(TokenKind::InlineHtml), html);
            }
        }
    }
}

fn close_tag_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    lexer.push(Some(TokenKind::CloseTag), value);
    lexer.in_script = false;
}

fn line_comment_handler(lexer: &mut Lexer, regex: &Regex) {
    let mut value = lexer.matched(regex);

    // `?>` ends the comment along with the script section
    if let Some(end) = value.find("?>") {
        value.truncate(end);
    }

    lexer.push(Some(TokenKind::Comment), value);
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);

    // member names after `->` and `::` are never keywords
    let is_member = lexer
        .last_significant()
        .is_some_and(|token| token.is_one_of_many(&[TokenKind::ObjectOperator, TokenKind::DoubleColon]));

    // neither are named arguments: `foo(class: 1)`
    let rest = lexer.remainder()[value.len()..].trim_start();
    let is_named_argument = rest.starts_with(':')
        && !rest.starts_with("::")
        && lexer
            .last_significant()
            .is_some_and(|token| token.is_punct("(") || token.is_punct(","));

    let kind = match RESERVED_LOOKUP.get(value.to_lowercase().as_str()) {
        Some(kind) if !is_member && !is_named_argument => *kind,
        _ => TokenKind::String,
    };

    lexer.push(Some(kind), value);
}

fn heredoc_handler(lexer: &mut Lexer, regex: &Regex) {
    let remainder = lexer.remainder();
    let Some(captures) = regex.captures(remainder) else {
        return;
    };
    let opening = captures.get(0).map_or(0, |found| found.end());
    let label = captures.get(1).map_or("", |found| found.as_str());

    let mut end = remainder.len();
    let mut offset = opening;
    for line in remainder[opening..].split_inclusive('\n') {
        let indented = line.trim_start_matches([' ', '\t']);
        let terminated = indented
            .strip_prefix(label)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'));

        if terminated {
            end = offset + (line.len() - indented.len()) + label.len();
            break;
        }
        offset += line.len();
    }

    let value = remainder[..end].to_string();
    lexer.push(Some(TokenKind::ConstantEncapsedString), value);
}

/// Splits PHP source into tokens.
///
/// Text outside of `<?php ... ?>` becomes [`TokenKind::InlineHtml`]. Input
/// no pattern recognises is reported as [`ErrorImpl::UnrecognisedToken`].
pub fn tokenize(source: &str, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        if !lex.in_script {
            lex.scan_inline_html();
            continue;
        }

        let pattern = SCRIPT_PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken { token: lex.at().to_string() },
                    Position(lex.line, Rc::clone(&lex.file)),
                ))
            }
        }
    }

    debug!("{} tokens found in {}", lex.tokens.len(), lex.file);
    Ok(lex.tokens)
}
