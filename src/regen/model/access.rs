//! Accessor availability of a generated property

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which accessors a property exposes.
///
/// Modes form a small lattice over (readable, writable); [`AccessMode::restrict`] is its
/// meet, which is all the derivation from a macro category needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessMode {
    #[default]
    ReadWrite,
    ReadOnly,
    WriteOnly,
    NoAccess,
}

impl AccessMode {
    pub fn from_capabilities(readable: bool, writable: bool) -> Self {
        match (readable, writable) {
            (true, true) => AccessMode::ReadWrite,
            (true, false) => AccessMode::ReadOnly,
            (false, true) => AccessMode::WriteOnly,
            (false, false) => AccessMode::NoAccess,
        }
    }

    pub fn can_read(self) -> bool {
        matches!(self, AccessMode::ReadWrite | AccessMode::ReadOnly)
    }

    pub fn can_write(self) -> bool {
        matches!(self, AccessMode::ReadWrite | AccessMode::WriteOnly)
    }

    /// Keep only the capabilities present in both modes.
    pub fn restrict(self, other: AccessMode) -> AccessMode {
        AccessMode::from_capabilities(
            self.can_read() && other.can_read(),
            self.can_write() && other.can_write(),
        )
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessMode::ReadWrite => "ReadWrite",
            AccessMode::ReadOnly => "ReadOnly",
            AccessMode::WriteOnly => "WriteOnly",
            AccessMode::NoAccess => "NoAccess",
        };
        f.write_str(name)
    }
}
