//! Directive tags embedded in comments
//!
//! Generated files mark regions with comment lines that look like markup:
//!
//!     //<file sync="Demand"/>
//!     //<gen:accessors sync="Replace">
//!     ...generated...
//!     //</gen:accessors>
//!
//! [`TagParser`] turns a text into a lossless [`TagTree`]; the merge engines pick regions out of
//! it and re-emit everything else byte for byte. The comment delimiter is a parameter so the
//! same grammar works for `//`, `#`, `--` and friends.

pub mod directive;
pub mod parser;
pub mod tree;

pub use directive::{
    read_file_gen_mode, read_file_sync_mode, Directive, GenMode, RegionGen, RegionSync, SyncMode,
    GEN_ATTRIBUTE, SYNC_ATTRIBUTE,
};
pub use parser::{is_tag_name, Marker, TagParser};
pub use tree::{Attributes, TagElement, TagNode, TagTree};

/// Comment delimiter used when none is configured
pub const DEFAULT_DELIMITER: &str = "//";
