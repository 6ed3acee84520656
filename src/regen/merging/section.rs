//! Named-section regeneration
//!
//! Keeps one machine owned region fresh inside a hand maintained file. The file level `gen`
//! directive decides how eager that is; without one the file is treated as `Demand`.

use crate::regen::error::{ParserError, ParserResult};
use crate::regen::tags::{
    is_tag_name, read_file_gen_mode, Directive, GenMode, RegionGen, TagElement, TagNode,
    TagParser, DEFAULT_DELIMITER, GEN_ATTRIBUTE,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRegenerator {
    parser: TagParser,
}

impl Default for SectionRegenerator {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl SectionRegenerator {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            parser: TagParser::new(delimiter),
        }
    }

    /// Replace the content of section `name` in `existing` with `content`.
    ///
    /// - `Skip`: the text is returned unchanged.
    /// - `Force`: the first section named `name` is replaced whatever its attributes; when
    ///   there is none, a `gen="Replace"` section is appended at the end of the text.
    /// - `Demand`: the section is replaced only if it already carries `gen="Replace"`.
    ///
    /// `name` must be a valid tag name, otherwise the appended section could never be found
    /// again.
    pub fn regenerate(&self, existing: &str, name: &str, content: &str) -> ParserResult<String> {
        if !is_tag_name(name) {
            return Err(ParserError::syntax(
                name,
                0,
                format!("`{name}` is not a valid section name"),
            ));
        }

        let mode = read_file_gen_mode(&self.parser, existing).unwrap_or(GenMode::Demand);
        debug!(section = name, ?mode, "regenerating section");

        if mode == GenMode::Skip {
            return Ok(existing.to_string());
        }

        let tree = self.parser.parse(existing)?;
        let delimiter = self.parser.delimiter();
        let section = tree.find(name);
        let target = match (mode, section) {
            (GenMode::Force, Some(section)) => section,
            (GenMode::Force, None) => {
                debug!(section = name, "section not found, appending");
                return Ok(append_section(existing, name, content, delimiter));
            }
            (_, Some(section)) if is_machine_owned(section) => section,
            (_, section) => {
                debug!(
                    section = name,
                    found = section.is_some(),
                    "no machine owned section, leaving file untouched"
                );
                return Ok(existing.to_string());
            }
        };

        let replacement = Replacement {
            offset: target.offset,
            text: replaced_section(target, content, delimiter),
        };
        let mut out = String::with_capacity(existing.len() + content.len());
        replacement.nodes(&tree.children, &mut out);
        Ok(out)
    }
}

/// Regenerate with an explicit delimiter.
pub fn regenerate(existing: &str, name: &str, content: &str, delimiter: &str) -> ParserResult<String> {
    SectionRegenerator::new(delimiter).regenerate(existing, name, content)
}

/// Re-emits a tree with one element, identified by its offset, swapped for new text
struct Replacement {
    offset: usize,
    text: String,
}

impl Replacement {
    fn nodes(&self, nodes: &[TagNode], out: &mut String) {
        for node in nodes {
            match node {
                TagNode::Text(text) => out.push_str(text),
                TagNode::Element(element) if element.offset == self.offset => {
                    out.push_str(&self.text)
                }
                TagNode::Element(element) => {
                    out.push_str(&element.open_marker);
                    self.nodes(&element.children, out);
                    out.push_str(&element.close_marker);
                }
            }
        }
    }
}

fn is_machine_owned(section: &TagElement) -> bool {
    section.attribute(GEN_ATTRIBUTE).and_then(RegionGen::parse) == Some(RegionGen::Replace)
}

fn with_line_break(content: &str) -> String {
    let mut content = content.to_string();
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

/// The section's markers around `content`
fn replaced_section(section: &TagElement, content: &str, delimiter: &str) -> String {
    let (open, close) = if section.is_self_closing() {
        expand_self_closing(section, delimiter)
    } else {
        (section.open_marker.clone(), section.close_marker.clone())
    };
    format!("{open}{}{close}", with_line_break(content))
}

/// Turn `//<name .../>` into an open marker and a matching close marker, keeping the
/// indentation and line ending of the original line.
fn expand_self_closing(section: &TagElement, delimiter: &str) -> (String, String) {
    let marker = &section.open_marker;
    let body = marker.trim_end_matches(['\r', '\n']);
    let line_end = match &marker[body.len()..] {
        "" => "\n",
        ending => ending,
    };
    let indent = &marker[..marker.len() - marker.trim_start_matches([' ', '\t']).len()];

    let trimmed = body.trim_end();
    let open = match trimmed.strip_suffix("/>") {
        Some(head) => format!("{}>", head.trim_end()),
        None => trimmed.to_string(),
    };
    (
        format!("{open}{line_end}"),
        format!("{indent}{delimiter}</{}>{line_end}", section.name),
    )
}

fn append_section(existing: &str, name: &str, content: &str, delimiter: &str) -> String {
    let mut out = existing.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    let directive = Directive::new(name).attribute(GEN_ATTRIBUTE, RegionGen::Replace);
    out.push_str(&directive.wrap(content, delimiter));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_returns_input() {
        let existing = "//<file gen=\"Skip\"/>\n//<widgets gen=\"Replace\">\nold\n//</widgets>\n";
        assert_eq!(regenerate(existing, "widgets", "new", "//").expect("regen"), existing);
    }

    #[test]
    fn test_demand_replaces_machine_owned_section() {
        let existing = "keep\n//<widgets gen=\"Replace\" extra=\"1\">\nold\n//</widgets>\ntail\n";
        let updated = regenerate(existing, "widgets", "new", "//").expect("regen");
        assert_eq!(
            updated,
            "keep\n//<widgets gen=\"Replace\" extra=\"1\">\nnew\n//</widgets>\ntail\n"
        );
    }

    #[test]
    fn test_demand_ignores_other_families() {
        let existing = "//<widgets sync=\"Replace\">\nold\n//</widgets>\n";
        assert_eq!(regenerate(existing, "widgets", "new", "//").expect("regen"), existing);
    }

    #[test]
    fn test_force_replaces_regardless_of_attributes() {
        let existing = "//<file gen=\"Force\"/>\n//<widgets sync=\"Reserve\">\nold\n//</widgets>\n";
        let updated = regenerate(existing, "widgets", "new\n", "//").expect("regen");
        assert_eq!(
            updated,
            "//<file gen=\"Force\"/>\n//<widgets sync=\"Reserve\">\nnew\n//</widgets>\n"
        );
    }

    #[test]
    fn test_force_expands_self_closing_section() {
        let existing = "//<file gen=\"Force\"/>\n  //<widgets gen=\"Replace\" />";
        let updated = regenerate(existing, "widgets", "a", "//").expect("regen");
        assert_eq!(
            updated,
            "//<file gen=\"Force\"/>\n  //<widgets gen=\"Replace\">\na\n  //</widgets>\n"
        );
    }

    #[test]
    fn test_invalid_section_name_is_rejected() {
        let existing = "//<file gen=\"Force\"/>\nx\n";
        let err = regenerate(existing, "my widgets", "a", "//").unwrap_err();
        assert!(matches!(err, ParserError::Syntax { .. }));
        assert!(err.to_string().contains("`my widgets` is not a valid section name"));
    }

    #[test]
    fn test_force_appends_missing_section() {
        let existing = "# <file gen=\"Force\"/>\nx = 1";
        let updated = regenerate(existing, "widgets", "y = 2", "#").expect("regen");
        assert_eq!(
            updated,
            "# <file gen=\"Force\"/>\nx = 1\n#<widgets gen=\"Replace\">\ny = 2\n#</widgets>\n"
        );
    }
}
