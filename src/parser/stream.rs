//! Forward-only token cursor shared by the file parser and every element
//! parser it delegates to.

use std::rc::Rc;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position,
};

/// An ordered token sequence with a single cursor.
///
/// The cursor only ever moves forward. Whoever is handed `&mut TokenStream`
/// to parse a structure must return with the cursor one token past that
/// structure's lexical end; the caller resumes from exactly there.
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Current position; `tokens.len()` once exhausted.
    pos: usize,
    file: Rc<String>,
    /// Recoverable failures met while parsing, waiting to be reported.
    failures: Vec<Error>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        TokenStream {
            tokens,
            pos: 0,
            file,
            failures: vec![],
        }
    }

    /// The token under the cursor, or `None` once the stream is exhausted.
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().and_then(|token| token.kind)
    }

    /// Moves the cursor one token forward and returns the new current token.
    pub fn advance(&mut self) -> Option<&Token> {
        self.step();
        self.current()
    }

    /// Position of the cursor.
    pub fn key(&self) -> usize {
        self.pos
    }

    pub fn valid(&self) -> bool {
        self.pos < self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn file(&self) -> &Rc<String> {
        &self.file
    }

    /// Scans up to `max_lookahead` tokens after the cursor for the first
    /// token of `kind` without moving the cursor.
    ///
    /// Gives up as soon as a token of one of `stop_kinds` is seen first.
    pub fn find_next_by_type(
        &self,
        kind: TokenKind,
        max_lookahead: usize,
        stop_kinds: &[TokenKind],
    ) -> Option<&Token> {
        self.find_next_offset_by_type(kind, max_lookahead, stop_kinds)
            .and_then(|offset| self.peek(offset))
    }

    /// Like [`find_next_by_type`](Self::find_next_by_type), but returns the
    /// match's offset from the cursor.
    pub fn find_next_offset_by_type(
        &self,
        kind: TokenKind,
        max_lookahead: usize,
        stop_kinds: &[TokenKind],
    ) -> Option<usize> {
        for offset in 1..=max_lookahead {
            let token = self.peek(offset)?;
            if token.is_one_of_many(stop_kinds) {
                return None;
            }
            if token.is(kind) {
                return Some(offset);
            }
        }

        None
    }

    /// The token `offset` positions after the cursor.
    pub fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    /// Scans up to `max_lookbehind` tokens before the cursor for the nearest
    /// token of `kind` without moving the cursor.
    ///
    /// Gives up as soon as punctuation whose content is in `stop_contents`
    /// is seen first.
    pub fn find_previous_by_type(
        &self,
        kind: TokenKind,
        max_lookbehind: usize,
        stop_contents: &[&str],
    ) -> Option<&Token> {
        for offset in 1..=max_lookbehind.min(self.pos) {
            let token = &self.tokens[self.pos - offset];
            if token.kind.is_none() && stop_contents.contains(&token.value.as_str()) {
                return None;
            }
            if token.is(kind) {
                return Some(token);
            }
        }

        None
    }

    /// Moves the cursor forward, at most `max_lookahead` tokens, until a token
    /// of `kind` is under it.
    ///
    /// Stops early, returning `None` with the cursor on the stopping token,
    /// when a token whose content is in `stop_contents` is reached first.
    /// The cursor is never moved back, not even when nothing is found.
    pub fn goto_next_by_type(
        &mut self,
        kind: TokenKind,
        max_lookahead: usize,
        stop_contents: &[&str],
    ) -> Option<&Token> {
        let mut matched = None;

        for _ in 0..max_lookahead {
            self.step();
            let token = self.tokens.get(self.pos)?;
            if stop_contents.contains(&token.value.as_str()) {
                return None;
            }
            if token.is(kind) {
                matched = Some(self.pos);
                break;
            }
        }

        matched.and_then(|index| self.tokens.get(index))
    }

    /// Moves the cursor past whitespace and comments.
    pub fn skip_trivia(&mut self) {
        while self.current().is_some_and(|token| token.is_trivia()) {
            self.step();
        }
    }

    /// Advances once, then past any trivia, returning the first significant
    /// token.
    pub fn next_significant(&mut self) -> Option<&Token> {
        self.step();
        self.skip_trivia();
        self.current()
    }

    /// Moves past the current token if it is the punctuation `content`.
    pub fn expect_punct(&mut self, content: &str) -> Result<(), Error> {
        match self.current() {
            Some(token) if token.is_punct(content) => {
                self.step();
                Ok(())
            }
            Some(token) => Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.value.clone(),
                    expected: format!("`{}`", content),
                },
                self.get_position(),
            )),
            None => Err(self.end_of_stream(&format!("`{}`", content))),
        }
    }

    /// With the cursor on `{`, moves it one past the matching `}`.
    pub fn skip_block(&mut self) -> Result<(), Error> {
        let mut depth = 0usize;

        while let Some(token) = self.current() {
            if token.is_punct("{") {
                depth += 1;
            } else if token.is_punct("}") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.step();
                    return Ok(());
                }
            }
            self.step();
        }

        Err(self.end_of_stream("`}`"))
    }

    /// Keeps a failure that did not stop parsing.
    pub fn record_failure(&mut self, error: Error) {
        self.failures.push(error);
    }

    /// Hands over the failures recorded so far.
    pub fn take_failures(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.failures)
    }

    pub fn end_of_stream(&self, expected: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedEndOfStream {
                expected: expected.to_string(),
            },
            self.get_position(),
        )
    }

    /// Returns the line of the current token (or of the last token once
    /// exhausted).
    pub fn get_position(&self) -> Position {
        let line = self
            .current()
            .or_else(|| self.tokens.last())
            .map_or(0, |token| token.line);

        Position(line, Rc::clone(&self.file))
    }

    fn step(&mut self) {
        let previous = self.pos;
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        debug_assert!(self.pos >= previous, "token cursor moved backwards");
    }
}
