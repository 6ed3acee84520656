//! Token definitions for annotated declaration sources
//!
//! The extractor only needs a coarse view of the host language: enough to find namespaces,
//! enum declarations, their members and the comments attached to them. Everything else in a
//! module is tokenized just well enough to be skipped. Tokenization is handled by logos.
use crate::regen::error::{ParserError, ParserResult};
use logos::Logos;
use std::ops::Range;

/// All tokens the declaration scanner distinguishes
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    // Spacing
    #[regex(r"[ \t\r\f]+")]
    Whitespace,
    #[token("\n")]
    Newline,

    // Comments
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // Words and literals
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"0[xX][0-9a-fA-F]+[uUlL]*|[0-9]+[uUlL]*")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,
    #[regex(r"'([^'\\\n]|\\.)*'")]
    CharLiteral,

    // Punctuation
    #[token("::")]
    DoubleColon,
    #[token(":")]
    Colon,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("=")]
    Equals,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("#")]
    Hash,
    #[token("-")]
    Minus,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    /// Any character logos does not classify
    Other,
}

fn block_comment(lex: &mut logos::Lexer<Token>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

impl Token {
    /// Whitespace, newlines and comments
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment | Token::BlockComment
        )
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment | Token::BlockComment)
    }
}

/// Tokenize a source and keep the byte span of every token.
///
/// Characters the lexer cannot classify become [`Token::Other`] so that unrelated code never
/// stops the scan. The only lexical error is a block comment without its closing `*/`.
pub fn tokenize_with_spans(source: &str) -> ParserResult<Vec<(Token, Range<usize>)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) if source[span.clone()].starts_with("/*") => {
                return Err(ParserError::syntax(
                    source,
                    span.start,
                    "unterminated block comment",
                ));
            }
            Err(()) => tokens.push((Token::Other, span)),
        }
    }

    Ok(tokens)
}

/// Strip the comment markers from a comment token's text.
///
/// Returns the length of the leading marker together with the body.
pub fn comment_body(text: &str) -> (usize, &str) {
    if let Some(rest) = text.strip_prefix("//") {
        let body = rest.trim_start_matches('/');
        (text.len() - body.len(), body)
    } else if let Some(rest) = text.strip_prefix("/*") {
        (2, rest.strip_suffix("*/").unwrap_or(rest))
    } else {
        (0, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize_with_spans(source)
            .expect("tokenize")
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_enum_member_line() {
        assert_eq!(
            kinds("Name = 5, // GET(int, Name)\n"),
            vec![
                Token::Identifier,
                Token::Whitespace,
                Token::Equals,
                Token::Whitespace,
                Token::Number,
                Token::Comma,
                Token::Whitespace,
                Token::LineComment,
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let tokens = tokenize_with_spans("a /* x\n y */ b").expect("tokenize");
        assert_eq!(tokens[2].0, Token::BlockComment);
        assert_eq!(tokens[2].1, 2..12);
        assert_eq!(tokens[4].0, Token::Identifier);
    }

    #[test]
    fn test_unterminated_block_comment_fails() {
        let err = tokenize_with_spans("enum A { /* open").unwrap_err();
        assert!(err.to_string().contains("unterminated block comment"));
        assert_eq!(err.location().offset, 9);
    }

    #[test]
    fn test_unknown_characters_become_other() {
        assert_eq!(
            kinds("a @ b"),
            vec![
                Token::Identifier,
                Token::Whitespace,
                Token::Other,
                Token::Whitespace,
                Token::Identifier,
            ]
        );
    }

    #[test]
    fn test_scope_operator_and_hex() {
        assert_eq!(
            kinds("a::b 0x1F"),
            vec![
                Token::Identifier,
                Token::DoubleColon,
                Token::Identifier,
                Token::Whitespace,
                Token::Number,
            ]
        );
    }

    #[test]
    fn test_comment_body() {
        assert_eq!(comment_body("// GET(int, A)"), (2, " GET(int, A)"));
        assert_eq!(comment_body("/// doc"), (3, " doc"));
        assert_eq!(comment_body("/* x */"), (2, " x "));
    }

    #[test]
    fn test_token_predicates() {
        assert!(Token::Whitespace.is_trivia());
        assert!(Token::BlockComment.is_trivia());
        assert!(Token::LineComment.is_comment());
        assert!(!Token::Identifier.is_trivia());
        assert!(!Token::Newline.is_comment());
    }
}
