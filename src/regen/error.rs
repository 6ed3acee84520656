//! Error types shared by the extractor, the tag parser and the merge engines
//!
//! Every failure is fail-fast: the parse that raised it is abandoned and no partially built
//! model or tree is returned. Each error carries an [`ErrorLocation`] so callers can point
//! at the offending byte without re-scanning the source.

use crate::regen::scanning::location::SourceLocation;
use std::fmt;

/// Where in the source an error was detected, with a little surrounding text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLocation {
    /// Byte offset into the parsed text
    pub offset: usize,
    /// 1-based row
    pub row: usize,
    /// 1-based column, counted in characters
    pub column: usize,
    /// Up to 10 characters preceding the offset
    pub leading: String,
    /// Up to 50 characters starting at the offset
    pub trailing: String,
}

impl ErrorLocation {
    pub const LEADING_CONTEXT: usize = 10;
    pub const TRAILING_CONTEXT: usize = 50;

    /// Build a location for `offset` within `source`.
    pub fn at(source: &str, offset: usize) -> Self {
        SourceLocation::new(source).error_location(offset)
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (offset {}) near `{}|{}`",
            self.row,
            self.column,
            self.offset,
            self.leading.escape_debug(),
            self.trailing.escape_debug()
        )
    }
}

/// Errors raised while parsing annotated declarations or directive tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParserError {
    /// Malformed annotation or tag syntax
    #[error("{message} at {location}")]
    Syntax {
        message: String,
        location: ErrorLocation,
    },
    /// An attribute payload lacks a key it must carry
    #[error("`@@{attribute}` payload is missing required key `{key}` at {location}")]
    KeyNotFound {
        attribute: String,
        key: String,
        location: ErrorLocation,
    },
    /// A key that must be unique appears twice
    #[error("duplicated key `{key}` at {location}")]
    KeyDuplicated { key: String, location: ErrorLocation },
    /// An open tag without a close, or a close without an open
    #[error("unmatched tag `{name}`: {reason} at {location}")]
    UnmatchedTag {
        name: String,
        reason: String,
        location: ErrorLocation,
    },
}

impl ParserError {
    pub fn syntax(source: &str, offset: usize, message: impl Into<String>) -> Self {
        ParserError::Syntax {
            message: message.into(),
            location: ErrorLocation::at(source, offset),
        }
    }

    pub fn key_not_found(
        source: &str,
        offset: usize,
        attribute: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        ParserError::KeyNotFound {
            attribute: attribute.into(),
            key: key.into(),
            location: ErrorLocation::at(source, offset),
        }
    }

    pub fn key_duplicated(source: &str, offset: usize, key: impl Into<String>) -> Self {
        ParserError::KeyDuplicated {
            key: key.into(),
            location: ErrorLocation::at(source, offset),
        }
    }

    pub fn unmatched_tag(
        source: &str,
        offset: usize,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ParserError::UnmatchedTag {
            name: name.into(),
            reason: reason.into(),
            location: ErrorLocation::at(source, offset),
        }
    }

    pub fn location(&self) -> &ErrorLocation {
        match self {
            ParserError::Syntax { location, .. }
            | ParserError::KeyNotFound { location, .. }
            | ParserError::KeyDuplicated { location, .. }
            | ParserError::UnmatchedTag { location, .. } => location,
        }
    }
}

/// Result alias used across the parsing modules.
pub type ParserResult<T> = Result<T, ParserError>;

/// Errors raised while loading configuration or building registries from it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("macro keyword `{0}` is not an identifier")]
    InvalidMacroKeyword(String),
    #[error("macro keyword `{0}` does not match any known macro shape")]
    UnknownMacroShape(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_is_one_based() {
        let location = ErrorLocation::at("first\nsecond", 8);
        assert_eq!(location.row, 2);
        assert_eq!(location.column, 3);
        assert_eq!(location.leading, "first\nse");
        assert_eq!(location.trailing, "cond");
    }

    #[test]
    fn test_context_is_clamped() {
        let source = format!("{}X{}", "a".repeat(30), "b".repeat(80));
        let location = ErrorLocation::at(&source, 30);
        assert_eq!(location.leading, "a".repeat(10));
        assert_eq!(location.trailing.chars().count(), 50);
        assert!(location.trailing.starts_with('X'));
    }

    #[test]
    fn test_display_mentions_message_and_row() {
        let err = ParserError::syntax("enum {", 5, "expected declaration name");
        let rendered = err.to_string();
        assert!(rendered.contains("expected declaration name"));
        assert!(rendered.contains("line 1, column 6"));
    }
}
