//! Directive values carried by tag attributes
//!
//! Two attribute families share the tag grammar and never interfere:
//!
//! - `sync`: file level [`SyncMode`] or region level [`RegionSync`], read by the sync engine
//! - `gen`: file level [`GenMode`] or region level [`RegionGen`], read by the section
//!   regenerator
//!
//! Values are matched ASCII case-insensitively. An unknown value is treated as absent.

use super::parser::TagParser;
use super::tree::Attributes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SYNC_ATTRIBUTE: &str = "sync";
pub const GEN_ATTRIBUTE: &str = "gen";

macro_rules! directive_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(value))
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value).ok_or_else(|| {
                    let expected: Vec<_> = Self::ALL.iter().map(|mode| mode.as_str()).collect();
                    format!("unknown value `{value}`, expected one of {}", expected.join(", "))
                })
            }
        }
    };
}

directive_enum! {
    /// How a whole file is synchronized with its freshly generated version
    SyncMode { Full, Demand, Skip, Force }
}

directive_enum! {
    /// Per-region override inside a synchronized file
    RegionSync { Reserve, Replace }
}

directive_enum! {
    /// Whether a named section is regenerated
    GenMode { Force, Demand, Skip }
}

directive_enum! {
    /// Marks a section as machine owned
    RegionGen { Replace }
}

/// First file level `sync` value among the open markers of `text`.
///
/// Only marker lines are examined; the text does not have to parse as a tree.
pub fn read_file_sync_mode(parser: &TagParser, text: &str) -> Option<SyncMode> {
    parser
        .open_markers(text)
        .find_map(|(_, attributes)| attributes.get(SYNC_ATTRIBUTE).and_then(SyncMode::parse))
}

/// First file level `gen` value among the open markers of `text`.
pub fn read_file_gen_mode(parser: &TagParser, text: &str) -> Option<GenMode> {
    parser
        .open_markers(text)
        .find_map(|(_, attributes)| attributes.get(GEN_ATTRIBUTE).and_then(GenMode::parse))
}

/// A tag to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub attributes: Attributes,
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn attribute(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.attributes.insert(key, value.to_string());
        self
    }

    pub fn open_marker(&self, delimiter: &str) -> String {
        if self.attributes.is_empty() {
            format!("{delimiter}<{}>\n", self.name)
        } else {
            format!("{delimiter}<{} {}>\n", self.name, self.attributes)
        }
    }

    pub fn close_marker(&self, delimiter: &str) -> String {
        format!("{delimiter}</{}>\n", self.name)
    }

    /// Open marker, `content` (given a trailing line break if it lacks one), close marker.
    pub fn wrap(&self, content: &str, delimiter: &str) -> String {
        let mut out = self.open_marker(delimiter);
        out.push_str(content);
        if !content.is_empty() && !content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&self.close_marker(delimiter));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_case_insensitive() {
        assert_eq!(SyncMode::parse("demand"), Some(SyncMode::Demand));
        assert_eq!(SyncMode::parse(" FORCE "), Some(SyncMode::Force));
        assert_eq!(SyncMode::parse("Reserve"), None);
        assert_eq!(RegionSync::parse("reserve"), Some(RegionSync::Reserve));
        assert_eq!(GenMode::parse("Replace"), None);
        assert_eq!(RegionGen::parse("replace"), Some(RegionGen::Replace));
    }

    #[test]
    fn test_from_str_lists_choices() {
        let err = "Sometimes".parse::<SyncMode>().unwrap_err();
        assert_eq!(
            err,
            "unknown value `Sometimes`, expected one of Full, Demand, Skip, Force"
        );
    }

    #[test]
    fn test_file_modes_skip_region_values() {
        let parser = TagParser::new("//");
        let text = "//<a sync=\"Reserve\">\n//</a>\n//<file sync=\"Demand\" gen=\"Skip\"/>\n";
        assert_eq!(read_file_sync_mode(&parser, text), Some(SyncMode::Demand));
        assert_eq!(read_file_gen_mode(&parser, text), Some(GenMode::Skip));
        assert_eq!(read_file_sync_mode(&parser, "plain\n"), None);
    }

    #[test]
    fn test_file_mode_ignores_malformed_tree() {
        let parser = TagParser::new("//");
        let text = "//<file sync=\"Skip\">\n//</other>\n";
        assert_eq!(read_file_sync_mode(&parser, text), Some(SyncMode::Skip));
    }

    #[test]
    fn test_wrap() {
        let directive = Directive::new("widgets").attribute(GEN_ATTRIBUTE, RegionGen::Replace);
        assert_eq!(
            directive.wrap("a\nb", "//"),
            "//<widgets gen=\"Replace\">\na\nb\n//</widgets>\n"
        );
    }
}
