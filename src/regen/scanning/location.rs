//! Byte offset to row/column conversion
//!
//! Tokens and tag markers carry byte ranges. Errors need something a human can find in an
//! editor, so [`SourceLocation`] keeps a table of line starts and converts offsets with a
//! binary search. Rows and columns are 1-based; columns count characters, not bytes.

use crate::regen::error::ErrorLocation;
use std::fmt;

/// A 1-based row/column position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Provides fast conversion from byte offsets to row/column positions
pub struct SourceLocation<'src> {
    source: &'src str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl<'src> SourceLocation<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to the end.
    pub fn position(&self, byte_offset: usize) -> Position {
        let offset = floor_char_boundary(self.source, byte_offset);
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);
        let column = self.source[self.line_starts[line]..offset].chars().count();
        Position::new(line + 1, column + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Build the location (with context) reported by parser errors.
    pub fn error_location(&self, byte_offset: usize) -> ErrorLocation {
        let offset = floor_char_boundary(self.source, byte_offset);
        let position = self.position(offset);

        let before = &self.source[..offset];
        let skip = before
            .chars()
            .count()
            .saturating_sub(ErrorLocation::LEADING_CONTEXT);
        let leading: String = before.chars().skip(skip).collect();
        let trailing: String = self.source[offset..]
            .chars()
            .take(ErrorLocation::TRAILING_CONTEXT)
            .collect();

        ErrorLocation {
            offset,
            row: position.row,
            column: position.column,
            leading,
            trailing,
        }
    }
}

fn floor_char_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_positions() {
        let location = SourceLocation::new("enum A {}");
        assert_eq!(location.position(0), Position::new(1, 1));
        assert_eq!(location.position(5), Position::new(1, 6));
    }

    #[test]
    fn test_positions_after_newlines() {
        let location = SourceLocation::new("a\nbc\n\nd");
        assert_eq!(location.line_count(), 4);
        assert_eq!(location.position(2), Position::new(2, 1));
        assert_eq!(location.position(3), Position::new(2, 2));
        assert_eq!(location.position(5), Position::new(3, 1));
        assert_eq!(location.position(6), Position::new(4, 1));
    }

    #[test]
    fn test_columns_count_characters() {
        let location = SourceLocation::new("é = 1");
        // 'é' is two bytes wide
        assert_eq!(location.position(3), Position::new(1, 3));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let location = SourceLocation::new("ab");
        assert_eq!(location.position(99), Position::new(1, 3));
        assert_eq!(location.error_location(99).trailing, "");
    }
}
