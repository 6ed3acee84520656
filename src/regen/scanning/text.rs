//! Character cursor over comment text
//!
//! Member comments carry a small language of their own: an optional macro invocation,
//! free text and `@@` attributes, some with structured payloads. This cursor walks that text
//! while remembering where the slice sits in the full source, so offsets handed to errors are
//! always absolute.

/// What the text at the cursor starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leading<'a> {
    /// An identifier immediately followed by `(`
    Invocation { keyword: &'a str },
    /// The `@@` attribute marker
    Attribute,
    /// Anything else
    Text,
    End,
}

/// One argument of a macro invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument<'a> {
    /// Trimmed argument text
    pub text: &'a str,
    /// Absolute byte offset of the untrimmed argument
    pub offset: usize,
}

pub const ATTRIBUTE_MARKER: &str = "@@";

#[derive(Debug, Clone)]
pub struct TextCursor<'a> {
    text: &'a str,
    base: usize,
    pos: usize,
}

impl<'a> TextCursor<'a> {
    /// `base` is the absolute offset of `text` in the source being parsed.
    pub fn new(text: &'a str, base: usize) -> Self {
        Self { text, base, pos: 0 }
    }

    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advance by `len` bytes (clamped to the end of the text).
    pub fn advance(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.text.len());
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume an identifier (`[A-Za-z_][A-Za-z0-9_]*`).
    pub fn identifier(&mut self) -> Option<&'a str> {
        let len = identifier_len(self.rest());
        if len == 0 {
            return None;
        }
        let word = &self.rest()[..len];
        self.pos += len;
        Some(word)
    }

    /// Classify the text at the cursor without consuming anything.
    pub fn leading(&self) -> Leading<'a> {
        let rest = self.rest();
        if rest.is_empty() {
            return Leading::End;
        }
        if rest.starts_with(ATTRIBUTE_MARKER) {
            return Leading::Attribute;
        }
        let len = identifier_len(rest);
        if len > 0 && rest[len..].starts_with('(') {
            return Leading::Invocation {
                keyword: &rest[..len],
            };
        }
        Leading::Text
    }

    /// Consume text up to (not including) the next attribute marker.
    pub fn take_until_attribute(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.find(ATTRIBUTE_MARKER).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Consume a balanced group starting at the opener under the cursor.
    ///
    /// `(`, `{` and `[` nest; a closer that does not match the innermost opener is treated
    /// as plain text. Characters listed in `quotes` open literals that end at the next
    /// unescaped occurrence of the same character; delimiters inside literals are ignored.
    /// Returns the group including its delimiters, or `None` (cursor untouched) when the
    /// group never closes.
    pub fn balanced(&mut self, quotes: &[char]) -> Option<&'a str> {
        let rest = self.rest();
        let mut closers = Vec::new();
        let mut chars = rest.char_indices();

        while let Some((index, ch)) = chars.next() {
            if quotes.contains(&ch) {
                let mut closed = false;
                while let Some((_, inner)) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                    } else if inner == ch {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return None;
                }
                continue;
            }
            match ch {
                '(' => closers.push(')'),
                '{' => closers.push('}'),
                '[' => closers.push(']'),
                ')' | '}' | ']' if closers.last() == Some(&ch) => {
                    closers.pop();
                    if closers.is_empty() {
                        let end = index + ch.len_utf8();
                        self.pos += end;
                        return Some(&rest[..end]);
                    }
                }
                _ if closers.is_empty() => return None,
                _ => {}
            }
        }

        None
    }
}

/// Split the inside of a macro invocation at top-level commas.
///
/// Parentheses, braces, brackets and angle brackets nest, and quoted literals are opaque, so
/// `std::map<int, int>` or `L"a, b"` stay single arguments. An empty or blank list has no
/// arguments; `a, ` has two, the second empty.
pub fn split_arguments(inner: &str, base: usize) -> Vec<Argument<'_>> {
    if inner.trim().is_empty() {
        return Vec::new();
    }

    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut start = 0usize;
    let mut chars = inner.char_indices();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' | '\'' => {
                while let Some((_, inner_ch)) = chars.next() {
                    if inner_ch == '\\' {
                        chars.next();
                    } else if inner_ch == ch {
                        break;
                    }
                }
            }
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth = depth.saturating_sub(1),
            '<' => angle += 1,
            '>' => angle = angle.saturating_sub(1),
            ',' if depth == 0 && angle == 0 => {
                arguments.push(argument(inner, start, index, base));
                start = index + 1;
            }
            _ => {}
        }
    }
    arguments.push(argument(inner, start, inner.len(), base));
    arguments
}

fn argument(inner: &str, start: usize, end: usize, base: usize) -> Argument<'_> {
    Argument {
        text: inner[start..end].trim(),
        offset: base + start,
    }
}

fn identifier_len(text: &str) -> usize {
    let mut len = 0;
    for (index, ch) in text.char_indices() {
        let valid = if index == 0 {
            ch.is_ascii_alphabetic() || ch == '_'
        } else {
            ch.is_ascii_alphanumeric() || ch == '_'
        };
        if !valid {
            break;
        }
        len = index + ch.len_utf8();
    }
    len
}
