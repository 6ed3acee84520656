//! Whole-file synchronization
//!
//! Merges a freshly generated file into the copy already on disk. The outcome is decided by
//! two small tables instead of nested conditionals:
//!
//! | file mode | plan                         |
//! |-----------|------------------------------|
//! | `Skip`    | keep the existing text       |
//! | `Force`   | take the fresh text          |
//! | `Full`    | merge, fresh tree as skeleton    |
//! | `Demand`  | merge, existing tree as skeleton |
//!
//! | skeleton \ region | `Reserve`   | `Replace`   | none    |
//! |-------------------|-------------|-------------|---------|
//! | fresh             | counterpart | own         | recurse |
//! | existing          | own         | counterpart | recurse |
//!
//! The skeleton supplies ordering and every byte of plain text; the counterpart is only
//! consulted for regions the table sends to it.

use crate::regen::error::ParserResult;
use crate::regen::tags::{
    read_file_sync_mode, RegionSync, SyncMode, TagElement, TagNode, TagParser, TagTree,
    DEFAULT_DELIMITER, SYNC_ATTRIBUTE,
};
use tracing::{debug, trace};

/// What happens to the file as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    KeepExisting,
    TakeFresh,
    Merge(Skeleton),
}

/// Which tree supplies ordering and plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skeleton {
    Fresh,
    Existing,
}

/// Where a region's content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The skeleton's own element, verbatim
    Own,
    /// The same-named element of the other tree
    Counterpart,
    /// Walk into the skeleton element's children
    Recurse,
}

impl Plan {
    pub fn for_mode(mode: SyncMode) -> Plan {
        match mode {
            SyncMode::Skip => Plan::KeepExisting,
            SyncMode::Force => Plan::TakeFresh,
            SyncMode::Full => Plan::Merge(Skeleton::Fresh),
            SyncMode::Demand => Plan::Merge(Skeleton::Existing),
        }
    }
}

impl Region {
    pub fn resolve(skeleton: Skeleton, directive: Option<RegionSync>) -> Region {
        match (skeleton, directive) {
            (Skeleton::Fresh, Some(RegionSync::Reserve)) => Region::Counterpart,
            (Skeleton::Fresh, Some(RegionSync::Replace)) => Region::Own,
            (Skeleton::Existing, Some(RegionSync::Reserve)) => Region::Own,
            (Skeleton::Existing, Some(RegionSync::Replace)) => Region::Counterpart,
            (_, None) => Region::Recurse,
        }
    }
}

/// Effective file mode.
///
/// `Force` and `Skip` from the caller always win. `Full` and `Demand` are defaults that a
/// file level `sync` directive in the existing text overrides.
pub fn resolve_mode(requested: SyncMode, declared: Option<SyncMode>) -> SyncMode {
    match (requested, declared) {
        (SyncMode::Force | SyncMode::Skip, _) => requested,
        (_, Some(declared)) => declared,
        (_, None) => requested,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEngine {
    parser: TagParser,
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl SyncEngine {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            parser: TagParser::new(delimiter),
        }
    }

    pub fn parser(&self) -> &TagParser {
        &self.parser
    }

    /// Merge `fresh` into `existing`.
    pub fn sync(&self, fresh: &str, existing: &str, default_mode: SyncMode) -> ParserResult<String> {
        let declared = read_file_sync_mode(&self.parser, existing);
        let mode = resolve_mode(default_mode, declared);
        let plan = Plan::for_mode(mode);
        debug!(?default_mode, ?declared, ?mode, ?plan, "sync plan");

        match plan {
            Plan::KeepExisting => Ok(existing.to_string()),
            Plan::TakeFresh => Ok(fresh.to_string()),
            Plan::Merge(skeleton) => {
                let fresh_tree = self.parser.parse(fresh)?;
                let existing_tree = self.parser.parse(existing)?;
                let (own, counterpart) = match skeleton {
                    Skeleton::Fresh => (&fresh_tree, &existing_tree),
                    Skeleton::Existing => (&existing_tree, &fresh_tree),
                };
                let mut out = String::with_capacity(fresh.len().max(existing.len()));
                let merge = Merge {
                    skeleton,
                    counterpart,
                };
                merge.nodes(&own.children, &mut out);
                Ok(out)
            }
        }
    }
}

/// Sync with the default `//` delimiter.
pub fn sync(fresh: &str, existing: &str, default_mode: SyncMode) -> ParserResult<String> {
    SyncEngine::default().sync(fresh, existing, default_mode)
}

struct Merge<'t> {
    skeleton: Skeleton,
    counterpart: &'t TagTree,
}

impl Merge<'_> {
    fn nodes(&self, nodes: &[TagNode], out: &mut String) {
        for node in nodes {
            match node {
                TagNode::Text(text) => out.push_str(text),
                TagNode::Element(element) => self.element(element, out),
            }
        }
    }

    fn element(&self, element: &TagElement, out: &mut String) {
        let directive = element.attribute(SYNC_ATTRIBUTE).and_then(RegionSync::parse);
        let region = Region::resolve(self.skeleton, directive);
        trace!(name = %element.name, ?directive, ?region, "region");

        match region {
            Region::Own => element.render_into(out),
            Region::Counterpart => match self.counterpart.find(&element.name) {
                Some(other) if element.is_self_closing() => other.render_into(out),
                Some(other) => {
                    out.push_str(&element.open_marker);
                    other.render_inner_into(out);
                    out.push_str(&element.close_marker);
                }
                None => {
                    debug!(name = %element.name, "region has no counterpart, keeping skeleton content");
                    element.render_into(out);
                }
            },
            Region::Recurse => {
                out.push_str(&element.open_marker);
                self.nodes(&element.children, out);
                out.push_str(&element.close_marker);
            }
        }
    }
}
