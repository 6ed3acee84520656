//! Line based tag parser
//!
//! A marker occupies a whole line: optional indentation, the comment delimiter, then the
//! tag. Anything else is plain text.
//!
//!     // <gen:widgets sync="Reserve">
//!     hand written text
//!     // </gen:widgets>
//!
//! Open markers need at least one `key="value"` attribute; a bare `// <b>` stays text so that
//! markup in ordinary comments is left alone. For the same reason a close marker only counts
//! when its name is open; `// </b>` with no open `b` is text.

use super::tree::{Attributes, TagElement, TagNode, TagTree};
use crate::regen::error::{ParserError, ParserResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// `<name attr="value" ...>` or `.../>` after the delimiter
static OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^[ \t]*<([A-Za-z_][\w.-]*(?::[A-Za-z_][\w.-]*)?)((?:[ \t]+[A-Za-z_][\w.:-]*[ \t]*=[ \t]*"[^"\n]*")+)[ \t]*(/?)>[ \t]*\r?\n?$"#,
    )
    .unwrap()
});

/// `</name>` after the delimiter
static CLOSE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*</([A-Za-z_][\w.-]*(?::[A-Za-z_][\w.-]*)?)[ \t]*>[ \t]*\r?\n?$").unwrap()
});

static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][\w.-]*(?::[A-Za-z_][\w.-]*)?$").unwrap());

static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z_][\w.:-]*)[ \t]*=[ \t]*"([^"\n]*)""#).unwrap());

/// Whether `name` can appear in a marker, as `tag` or `ns:tag`.
pub fn is_tag_name(name: &str) -> bool {
    TAG_NAME.is_match(name)
}

/// What a single line turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Open {
        name: String,
        attributes: Attributes,
        self_closing: bool,
    },
    Close {
        name: String,
    },
}

/// An open element waiting for its close marker
struct Frame {
    name: String,
    attributes: Attributes,
    open_marker: String,
    offset: usize,
    children: Vec<TagNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagParser {
    delimiter: String,
}

impl TagParser {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Classify one line. `offset` is the line's position in the full text and is only used
    /// for errors.
    pub fn marker(&self, text: &str, line: &str, offset: usize) -> ParserResult<Option<Marker>> {
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        let Some(rest) = line[indent..].strip_prefix(self.delimiter.as_str()) else {
            return Ok(None);
        };
        let rest_offset = offset + indent + self.delimiter.len();

        if let Some(captures) = OPEN_TAG.captures(rest) {
            let name = captures[1].to_string();
            let mut attributes = Attributes::new();
            if let Some(list) = captures.get(2) {
                for pair in ATTRIBUTE.captures_iter(list.as_str()) {
                    if !attributes.insert(&pair[1], &pair[2]) {
                        let at = rest_offset + list.start() + pair.get(0).map_or(0, |m| m.start());
                        return Err(ParserError::key_duplicated(text, at, &pair[1]));
                    }
                }
            }
            let self_closing = captures.get(3).is_some_and(|m| !m.as_str().is_empty());
            return Ok(Some(Marker::Open {
                name,
                attributes,
                self_closing,
            }));
        }

        if let Some(captures) = CLOSE_TAG.captures(rest) {
            return Ok(Some(Marker::Close {
                name: captures[1].to_string(),
            }));
        }

        Ok(None)
    }

    /// Iterate the open markers of a text without building a tree.
    ///
    /// Lines whose attributes cannot be read are skipped.
    pub fn open_markers<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (String, Attributes)> + 'a {
        lines(text).filter_map(move |(offset, line)| match self.marker(text, line, offset) {
            Ok(Some(Marker::Open {
                name, attributes, ..
            })) => Some((name, attributes)),
            _ => None,
        })
    }

    pub fn parse(&self, text: &str) -> ParserResult<TagTree> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Vec<TagNode> = Vec::new();
        let mut text_start: Option<usize> = None;

        for (offset, line) in lines(text) {
            let marker = match self.marker(text, line, offset)? {
                // A close naming no open tag is prose such as `// </p>`
                Some(Marker::Close { name }) if !stack.iter().any(|frame| frame.name == name) => {
                    trace!(%name, offset, "stray close marker kept as text");
                    None
                }
                marker => marker,
            };
            let Some(marker) = marker else {
                text_start.get_or_insert(offset);
                continue;
            };

            if let Some(start) = text_start.take() {
                let node = TagNode::Text(text[start..offset].to_string());
                children_of(&mut stack, &mut root).push(node);
            }

            match marker {
                Marker::Open {
                    name,
                    attributes,
                    self_closing: true,
                } => {
                    trace!(%name, offset, "self-closing tag");
                    children_of(&mut stack, &mut root).push(TagNode::Element(TagElement {
                        name,
                        attributes,
                        open_marker: line.to_string(),
                        children: Vec::new(),
                        close_marker: String::new(),
                        offset,
                    }));
                }
                Marker::Open {
                    name, attributes, ..
                } => {
                    trace!(%name, offset, "open tag");
                    stack.push(Frame {
                        name,
                        attributes,
                        open_marker: line.to_string(),
                        offset,
                        children: Vec::new(),
                    });
                }
                Marker::Close { name } => {
                    let frame = match stack.pop() {
                        Some(frame) if frame.name == name => frame,
                        // The name is open further down the stack
                        frame => {
                            let inner = frame.map(|frame| frame.name).unwrap_or_default();
                            return Err(ParserError::unmatched_tag(
                                text,
                                offset,
                                name,
                                format!("`{inner}` is still open"),
                            ));
                        }
                    };
                    trace!(name = %frame.name, offset, "close tag");
                    children_of(&mut stack, &mut root).push(TagNode::Element(TagElement {
                        name: frame.name,
                        attributes: frame.attributes,
                        open_marker: frame.open_marker,
                        children: frame.children,
                        close_marker: line.to_string(),
                        offset: frame.offset,
                    }));
                }
            }
        }

        if let Some(frame) = stack.pop() {
            return Err(ParserError::unmatched_tag(
                text,
                frame.offset,
                frame.name,
                "opened but never closed",
            ));
        }
        if let Some(start) = text_start {
            root.push(TagNode::Text(text[start..].to_string()));
        }

        Ok(TagTree { children: root })
    }
}

fn children_of<'a>(stack: &'a mut [Frame], root: &'a mut Vec<TagNode>) -> &'a mut Vec<TagNode> {
    match stack.last_mut() {
        Some(frame) => &mut frame.children,
        None => root,
    }
}

/// Lines with their line breaks, paired with their byte offsets.
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TagParser {
        TagParser::new("//")
    }

    #[test]
    fn test_marker_recognition() {
        let parser = parser();
        let open = parser
            .marker("", "  // <gen:widgets sync=\"Reserve\" gen=\"Replace\">\n", 0)
            .expect("marker");
        match open {
            Some(Marker::Open {
                name,
                attributes,
                self_closing,
            }) => {
                assert_eq!(name, "gen:widgets");
                assert_eq!(attributes.get("sync"), Some("Reserve"));
                assert_eq!(attributes.len(), 2);
                assert!(!self_closing);
            }
            other => panic!("unexpected marker {other:?}"),
        }

        assert_eq!(
            parser.marker("", "//</gen:widgets>\r\n", 0).expect("marker"),
            Some(Marker::Close {
                name: "gen:widgets".to_string()
            })
        );
    }

    #[test]
    fn test_lines_that_are_not_markers() {
        let parser = parser();
        for line in [
            "// <b>bold</b>\n",
            "// <widgets>\n",
            "<widgets sync=\"Full\">\n",
            "x // <widgets sync=\"Full\">\n",
            "# <widgets sync=\"Full\">\n",
        ] {
            assert_eq!(parser.marker("", line, 0).expect("marker"), None, "{line}");
        }
    }

    #[test]
    fn test_tag_names() {
        for name in ["widgets", "gen:widgets", "_a.b-c", "ns:x1"] {
            assert!(is_tag_name(name), "{name}");
        }
        for name in ["", "my widgets", "1st", "a:b:c", "<a>", "a\n"] {
            assert!(!is_tag_name(name), "{name:?}");
        }
    }

    #[test]
    fn test_self_closing_marker() {
        let marker = parser()
            .marker("", "//<file sync=\"Demand\"/>", 0)
            .expect("marker");
        assert!(matches!(marker, Some(Marker::Open { self_closing: true, .. })));
    }

    #[test]
    fn test_duplicate_attribute_fails() {
        let line = "//<a sync=\"Full\" sync=\"Skip\">\n";
        let err = parser().marker(line, line, 0).unwrap_err();
        assert!(matches!(err, ParserError::KeyDuplicated { ref key, .. } if key == "sync"));
        assert_eq!(err.location().offset, 17);
    }

    #[test]
    fn test_render_is_lossless() {
        let text = "head\n//<a sync=\"Reserve\">\nbody\n  //<b gen=\"Replace\"/>\n//</a>\ntail";
        let tree = parser().parse(text).expect("parse");
        assert_eq!(tree.render(), text);
        assert_eq!(tree.children.len(), 3);
        let a = tree.find("a").expect("a");
        assert_eq!(a.inner_text(), "body\n  //<b gen=\"Replace\"/>\n");
        assert!(tree.find("b").expect("b").is_self_closing());
    }

    #[test]
    fn test_unmatched_tags() {
        let err = parser().parse("//<a sync=\"Full\">\ntext\n").unwrap_err();
        assert!(matches!(err, ParserError::UnmatchedTag { ref name, .. } if name == "a"));
        assert_eq!(err.location().row, 1);

        let err = parser()
            .parse("//<a sync=\"Full\">\n//<b sync=\"Full\">\n//</a>\n//</b>\n")
            .unwrap_err();
        assert!(err.to_string().contains("`b` is still open"));
    }

    #[test]
    fn test_close_without_open_is_text() {
        let text = "// Renders a <p> block:\n// <p>\n// hello\n// </p>\nint main() {}\n";
        let tree = parser().parse(text).expect("parse");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.render(), text);
        assert!(tree.elements().next().is_none());

        let text = "//<a sync=\"Full\">\n// </p>\n//</a>\n";
        let tree = parser().parse(text).expect("parse");
        assert_eq!(tree.find("a").map(|e| e.inner_text()), Some("// </p>\n".into()));
    }

    #[test]
    fn test_other_delimiters() {
        let parser = TagParser::new("#");
        let tree = parser
            .parse("# <section gen=\"Replace\">\nx = 1\n# </section>\n")
            .expect("parse");
        assert_eq!(tree.find("section").map(|e| e.inner_text()), Some("x = 1\n".into()));
    }
}
