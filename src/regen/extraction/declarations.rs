//! Recursive descent over a declaration source
//!
//! The walk is linear: every token outside an enum declaration is either a namespace
//! construct, a brace that changes the nesting depth, or something to skip. An enum
//! declaration is parsed completely (name, class comments, members) before the walk resumes.

use super::attributes::{apply_to_class, apply_to_property, Annotation};
use super::macros::{parse_invocation, MacroRegistry};
use crate::regen::error::{ParserError, ParserResult};
use crate::regen::model::{ClassKind, EnumClassDescriptor, PropertyDescriptor};
use crate::regen::scanning::{Comment, Leading, Scanner, TextCursor, Token};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Name suffixes that decide a declaration's [`ClassKind`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassKindRules {
    /// Stripped before the other suffixes are tested
    pub property_suffix: String,
    pub form_suffix: String,
    pub argument_suffix: String,
    pub result_suffix: String,
}

impl Default for ClassKindRules {
    fn default() -> Self {
        Self {
            property_suffix: "Property".to_string(),
            form_suffix: "Form".to_string(),
            argument_suffix: "Argument".to_string(),
            result_suffix: "Result".to_string(),
        }
    }
}

impl ClassKindRules {
    pub fn classify(&self, name: &str) -> ClassKind {
        let stem = strip_suffix(name, &self.property_suffix).unwrap_or(name);
        if strip_suffix(stem, &self.form_suffix).is_some() {
            ClassKind::Form
        } else if strip_suffix(stem, &self.argument_suffix).is_some() {
            ClassKind::ActionArgument
        } else if strip_suffix(stem, &self.result_suffix).is_some() {
            ClassKind::Result
        } else {
            ClassKind::Object
        }
    }
}

fn strip_suffix<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() {
        None
    } else {
        name.strip_suffix(suffix)
    }
}

/// Turns annotated declaration sources into [`EnumClassDescriptor`]s.
///
/// The extractor itself is immutable; all parse state lives on the stack of
/// [`Extractor::parse`], so one instance can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    registry: MacroRegistry,
    class_kinds: ClassKindRules,
}

impl Extractor {
    pub fn new(registry: MacroRegistry, class_kinds: ClassKindRules) -> Self {
        Self {
            registry,
            class_kinds,
        }
    }

    pub fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    pub fn class_kinds(&self) -> &ClassKindRules {
        &self.class_kinds
    }

    /// Parse every enum declaration in `source`, in source order.
    pub fn parse(&self, source: &str) -> ParserResult<Vec<EnumClassDescriptor>> {
        let mut state = ParseState::new(self, source)?;
        state.run()?;
        debug!(declarations = state.classes.len(), "extracted declarations");
        Ok(state.classes)
    }
}

/// Parse with the built-in macro keywords and class kind suffixes.
pub fn parse(source: &str) -> ParserResult<Vec<EnumClassDescriptor>> {
    Extractor::default().parse(source)
}

/// A namespace that is currently open
struct Scope {
    /// Segments this namespace contributed
    segments: usize,
    /// Brace depth inside the namespace body; `None` for file-scoped namespaces
    depth: Option<usize>,
}

struct ParseState<'e, 'src> {
    extractor: &'e Extractor,
    source: &'src str,
    scanner: Scanner<'src>,
    scopes: Vec<Scope>,
    segments: Vec<String>,
    depth: usize,
    classes: Vec<EnumClassDescriptor>,
}

impl<'e, 'src> ParseState<'e, 'src> {
    fn new(extractor: &'e Extractor, source: &'src str) -> ParserResult<Self> {
        Ok(Self {
            extractor,
            source,
            scanner: Scanner::new(source)?,
            scopes: Vec::new(),
            segments: Vec::new(),
            depth: 0,
            classes: Vec::new(),
        })
    }

    fn run(&mut self) -> ParserResult<()> {
        loop {
            self.scanner.skip_trivia();
            let Some((token, text, _)) = self.scanner.advance() else {
                return Ok(());
            };
            match token {
                Token::Hash => self.scanner.skip_line(),
                Token::OpenBrace => self.depth += 1,
                Token::CloseBrace => self.close_brace(),
                Token::Identifier => match text {
                    "namespace" => self.namespace()?,
                    "using" => self.skip_statement(),
                    "enum" => self.declaration()?,
                    _ => {}
                },
                _ => {}
            }
        }
    }

    fn close_brace(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        while let Some(scope) = self.scopes.last() {
            match scope.depth {
                Some(depth) if self.depth < depth => {
                    let keep = self.segments.len() - scope.segments;
                    self.segments.truncate(keep);
                    self.scopes.pop();
                }
                _ => break,
            }
        }
    }

    fn skip_statement(&mut self) {
        while let Some((token, _, _)) = self.scanner.advance() {
            if token == Token::Semicolon {
                break;
            }
        }
    }

    /// Everything after the `namespace` keyword.
    fn namespace(&mut self) -> ParserResult<()> {
        let mut segments = Vec::new();
        loop {
            self.scanner.skip_trivia();
            if self.scanner.eat_keyword("inline") {
                continue;
            }
            if self.scanner.peek() != Some(Token::Identifier) {
                break;
            }
            let (segment, _) = self.scanner.expect_identifier("namespace name")?;
            segments.push(segment.to_string());
            if !self.scanner.eat(Token::DoubleColon) {
                break;
            }
        }

        self.scanner.skip_trivia();
        match self.scanner.peek() {
            Some(Token::OpenBrace) => {
                self.scanner.advance();
                self.depth += 1;
                self.open_scope(segments, Some(self.depth));
            }
            Some(Token::Semicolon) => {
                self.scanner.advance();
                self.open_scope(segments, None);
            }
            Some(Token::Equals) => self.skip_statement(),
            _ => return Err(self.scanner.error("expected `{` after namespace name")),
        }
        Ok(())
    }

    fn open_scope(&mut self, segments: Vec<String>, depth: Option<usize>) {
        trace!(namespace = %segments.join("."), ?depth, "entering namespace");
        self.scopes.push(Scope {
            segments: segments.len(),
            depth,
        });
        self.segments.extend(segments);
    }

    /// Everything after the `enum` keyword.
    fn declaration(&mut self) -> ParserResult<()> {
        if !self.scanner.eat_keyword("class") {
            self.scanner.eat_keyword("struct");
        }
        let (name, _) = self.scanner.expect_identifier("declaration name")?;

        let mut comments = Vec::new();
        loop {
            comments.extend(self.scanner.collect_comments());
            match self.scanner.peek() {
                Some(Token::OpenBrace) => {
                    self.scanner.advance();
                    break;
                }
                Some(Token::Semicolon) => {
                    self.scanner.advance();
                    trace!(name, "skipping forward declaration");
                    return Ok(());
                }
                // underlying type
                Some(Token::Colon | Token::DoubleColon | Token::Identifier) => {
                    self.scanner.advance();
                }
                _ => {
                    return Err(self
                        .scanner
                        .error(format!("expected `{{` to open `{name}`")))
                }
            }
        }
        comments.extend(self.scanner.trailing_comment());

        let mut class = EnumClassDescriptor {
            namespace: self.segments.join("."),
            kind: self.extractor.class_kinds.classify(name),
            name: name.to_string(),
            ..EnumClassDescriptor::default()
        };
        let mut raw_parts = Vec::new();
        for comment in &comments {
            let mut cursor = TextCursor::new(comment.body, comment.offset);
            let annotation = Annotation::scan(&mut cursor, self.source)?;
            let raw = apply_to_class(&annotation, self.source, &mut class)?;
            if !raw.is_empty() {
                raw_parts.push(raw);
            }
        }
        class.raw_command = raw_parts.join(" ");

        self.members(&mut class)?;
        self.scanner.skip_inline_whitespace();
        if self.scanner.peek() == Some(Token::Semicolon) {
            self.scanner.advance();
        }

        debug!(
            class = %class.qualified_name(),
            kind = ?class.kind,
            properties = class.properties.len(),
            "parsed declaration"
        );
        self.classes.push(class);
        Ok(())
    }

    fn members(&mut self, class: &mut EnumClassDescriptor) -> ParserResult<()> {
        let mut seen = HashSet::new();
        let mut next_ordinal: i64 = 0;

        loop {
            self.scanner.skip_trivia();
            match self.scanner.peek() {
                Some(Token::CloseBrace) => {
                    self.scanner.advance();
                    return Ok(());
                }
                Some(Token::Hash) => self.scanner.skip_line(),
                Some(Token::Identifier) => {
                    let (member, offset) = self.scanner.expect_identifier("enumerator name")?;
                    if !seen.insert(member) {
                        return Err(ParserError::key_duplicated(self.source, offset, member));
                    }

                    self.scanner.skip_inline_whitespace();
                    let ordinal = if self.scanner.peek() == Some(Token::Equals) {
                        self.scanner.advance();
                        self.enumerator_value(member)?
                    } else {
                        next_ordinal
                    };
                    next_ordinal = ordinal.saturating_add(1);

                    self.scanner.skip_inline_whitespace();
                    if self.scanner.peek() == Some(Token::Comma) {
                        self.scanner.advance();
                    }

                    let mut property = PropertyDescriptor::new(member, ordinal);
                    if let Some(comment) = self.scanner.trailing_comment() {
                        self.annotate(&comment, &mut property)?;
                    }
                    class.properties.push(property);
                }
                None => {
                    return Err(self
                        .scanner
                        .error(format!("expected `}}` to close `{}`", class.name)))
                }
                Some(_) => {
                    return Err(self
                        .scanner
                        .error(format!("expected enumerator name or `}}` in `{}`", class.name)))
                }
            }
        }
    }

    fn enumerator_value(&mut self, member: &str) -> ParserResult<i64> {
        self.scanner.skip_inline_whitespace();
        let negative = self.scanner.peek() == Some(Token::Minus);
        if negative {
            self.scanner.advance();
            self.scanner.skip_inline_whitespace();
        }

        let offset = self.scanner.offset();
        let literal = match self.scanner.peek() {
            Some(Token::Number) => self.scanner.advance().map(|(_, text, _)| text),
            _ => None,
        };
        let value = literal.and_then(parse_integer).ok_or_else(|| {
            ParserError::syntax(
                self.source,
                offset,
                format!("value of `{member}` must be an integer literal"),
            )
        })?;
        Ok(if negative { -value } else { value })
    }

    fn annotate(&self, comment: &Comment<'src>, property: &mut PropertyDescriptor) -> ParserResult<()> {
        let mut cursor = TextCursor::new(comment.body, comment.offset);
        cursor.skip_whitespace();
        if let Leading::Invocation { keyword } = cursor.leading() {
            if let Some(macro_type) = self.extractor.registry.lookup(keyword) {
                parse_invocation(&mut cursor, self.source, keyword, macro_type, property)?;
            }
        }
        let annotation = Annotation::scan(&mut cursor, self.source)?;
        apply_to_property(&annotation, self.source, property)
    }
}

/// Decimal or hexadecimal literal, integer suffixes ignored.
fn parse_integer(literal: &str) -> Option<i64> {
    let digits = literal.trim_end_matches(['u', 'U', 'l', 'L']);
    match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => digits.parse().ok(),
    }
}
