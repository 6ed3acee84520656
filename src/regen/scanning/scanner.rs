//! Position-tracked cursor over declaration tokens
//!
//! The extractor drives this cursor by hand (recursive descent): it peeks at the next
//! significant token, consumes what it recognizes and collects the comments it finds on the
//! way. All positions are byte offsets into the original source so that errors and
//! comment bodies can be mapped back exactly.

use super::tokens::{comment_body, tokenize_with_spans, Token};
use crate::regen::error::{ParserError, ParserResult};
use std::ops::Range;

/// A comment with its markers stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment<'src> {
    /// Comment text without `//` or `/* */`
    pub body: &'src str,
    /// Absolute byte offset of `body` in the source
    pub offset: usize,
}

pub struct Scanner<'src> {
    source: &'src str,
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> ParserResult<Self> {
        Ok(Self {
            source,
            tokens: tokenize_with_spans(source)?,
            pos: 0,
        })
    }

    /// Byte offset of the next token (or the end of the source).
    pub fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.source.len())
    }

    pub fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(token, _)| *token)
    }

    /// Text of the next token.
    pub fn peek_text(&self) -> Option<&'src str> {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| &self.source[span.clone()])
    }

    pub fn advance(&mut self) -> Option<(Token, &'src str, usize)> {
        let (token, span) = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        Some((token, &self.source[span.clone()], span.start))
    }

    /// Skip whitespace, newlines and comments.
    pub fn skip_trivia(&mut self) {
        while matches!(self.peek(), Some(token) if token.is_trivia()) {
            self.pos += 1;
        }
    }

    /// Skip spaces and tabs but stop at a newline or a comment.
    pub fn skip_inline_whitespace(&mut self) {
        while self.peek() == Some(Token::Whitespace) {
            self.pos += 1;
        }
    }

    /// Skip trivia, keeping every comment encountered.
    pub fn collect_comments(&mut self) -> Vec<Comment<'src>> {
        let mut comments = Vec::new();
        while let Some(token) = self.peek() {
            if !token.is_trivia() {
                break;
            }
            if token.is_comment() {
                comments.push(self.comment_at(self.pos));
            }
            self.pos += 1;
        }
        comments
    }

    /// Consume a comment that sits on the current line, if there is one.
    pub fn trailing_comment(&mut self) -> Option<Comment<'src>> {
        self.skip_inline_whitespace();
        if matches!(self.peek(), Some(token) if token.is_comment()) {
            let comment = self.comment_at(self.pos);
            self.pos += 1;
            Some(comment)
        } else {
            None
        }
    }

    /// Skip everything up to and including the next newline.
    pub fn skip_line(&mut self) {
        while let Some((token, _, _)) = self.advance() {
            if token == Token::Newline {
                break;
            }
        }
    }

    /// Consume the next significant token if it has the given kind.
    pub fn eat(&mut self, expected: Token) -> bool {
        self.skip_trivia();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the next significant token if it is the given identifier.
    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_trivia();
        if self.peek() == Some(Token::Identifier) && self.peek_text() == Some(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect_identifier(&mut self, what: &str) -> ParserResult<(&'src str, usize)> {
        self.skip_trivia();
        if self.peek() == Some(Token::Identifier) {
            if let Some((_, text, offset)) = self.advance() {
                return Ok((text, offset));
            }
        }
        Err(self.error(format!("expected {what}")))
    }

    /// Build a syntax error at the next token.
    pub fn error(&self, message: impl Into<String>) -> ParserError {
        ParserError::syntax(self.source, self.offset(), message)
    }

    fn comment_at(&self, index: usize) -> Comment<'src> {
        let span = &self.tokens[index].1;
        let (marker_len, body) = comment_body(&self.source[span.clone()]);
        Comment {
            body,
            offset: span.start + marker_len,
        }
    }
}
