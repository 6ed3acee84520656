//! Tag tree nodes
//!
//! A [`TagTree`] is a lossless view of a text: concatenating the rendering of its nodes gives
//! back the input byte for byte. Elements keep their marker lines verbatim, so an untouched
//! subtree is always re-emitted exactly as it was read.

use std::fmt;

/// Attributes of one tag, in the order they were written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Add an attribute. Returns `false` (and changes nothing) when the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Attributes {
    /// `key="value"` pairs separated by single spaces
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}=\"{value}\"")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagNode {
    /// Plain text between markers, possibly spanning many lines
    Text(String),
    Element(TagElement),
}

impl TagNode {
    pub fn render_into(&self, out: &mut String) {
        match self {
            TagNode::Text(text) => out.push_str(text),
            TagNode::Element(element) => element.render_into(out),
        }
    }

    pub fn as_element(&self) -> Option<&TagElement> {
        match self {
            TagNode::Element(element) => Some(element),
            TagNode::Text(_) => None,
        }
    }
}

/// A named region: open marker line, children, close marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagElement {
    /// `ns:name` or `name`
    pub name: String,
    pub attributes: Attributes,
    /// The whole open marker line, including its line break
    pub open_marker: String,
    pub children: Vec<TagNode>,
    /// The whole close marker line; empty for self-closing tags
    pub close_marker: String,
    /// Byte offset of the open marker in the parsed text
    pub offset: usize,
}

impl TagElement {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    pub fn is_self_closing(&self) -> bool {
        self.close_marker.is_empty()
    }

    pub fn render_into(&self, out: &mut String) {
        out.push_str(&self.open_marker);
        self.render_inner_into(out);
        out.push_str(&self.close_marker);
    }

    /// Render only what sits between the markers.
    pub fn render_inner_into(&self, out: &mut String) {
        for child in &self.children {
            child.render_into(out);
        }
    }

    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.render_inner_into(&mut out);
        out
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

/// The implicit root of a parsed text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagTree {
    pub children: Vec<TagNode>,
}

impl TagTree {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.render_into(&mut out);
        }
        out
    }

    /// First element named `name` in document order (pre-order).
    ///
    /// Tag names are expected to be unique within a file; when a name repeats, the first
    /// occurrence wins and later ones are never looked up.
    pub fn find(&self, name: &str) -> Option<&TagElement> {
        self.elements().find(|element| element.name == name)
    }

    /// Every element, parents before their children.
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            stack: vec![self.children.iter()],
        }
    }
}

/// Pre-order iterator over the elements of a [`TagTree`]
pub struct Elements<'a> {
    stack: Vec<std::slice::Iter<'a, TagNode>>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a TagElement;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(nodes) = self.stack.last_mut() {
            match nodes.next() {
                Some(TagNode::Element(element)) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                Some(TagNode::Text(_)) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}
