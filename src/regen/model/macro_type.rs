//! Macro categories
//!
//! A member comment such as `GETSET_SPTR(Widget, Child)` names its macro by keyword. The
//! keyword is classified exactly once, when the registry is built, into the closed
//! [`MacroType`] union. Everything downstream (argument slots, accessor derivation, collection
//! and object detection) matches on that union instead of looking at the keyword again.

use super::access::AccessMode;
use serde::{Deserialize, Serialize};

/// Marker in a keyword that makes the property an object reference
pub const OBJECT_MARKER: &str = "SPTR";
/// Marker in a keyword that adds a validation expression slot
pub const VALIDATE_MARKER: &str = "VALIDATE";
/// Marker in an action keyword that adds an argument type slot
pub const ARGUMENT_MARKER: &str = "ARG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MacroType {
    /// The member carries no recognized macro
    #[default]
    NoMacro,
    ScalarReadOnly,
    ScalarReadWrite,
    ValidatedReadOnly,
    ValidatedReadWrite,
    ObjectReadOnly,
    ObjectReadWrite,
    Vector,
    VectorObject,
    Set,
    SetObject,
    Map,
    MapObject,
    OrderedMap,
    OrderedMapObject,
    Manager,
    Action,
    ActionWithArgument,
}

/// How the arguments of a macro are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroCategory {
    None,
    Scalar,
    Collection,
    Manager,
    Action,
}

/// Keyword family, decided by prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Get,
    GetSet,
    Vector,
    Set,
    Map,
    OrderedMap,
    Manager,
    Action,
}

impl Family {
    /// Longer prefixes first: `ORDERED_MAP` before `MAP`, `GETSET` before `GET`.
    const PREFIXES: [(&'static str, Family); 8] = [
        ("ORDERED_MAP", Family::OrderedMap),
        ("MAP", Family::Map),
        ("VECTOR", Family::Vector),
        ("SET", Family::Set),
        ("MANAGER", Family::Manager),
        ("ACTION", Family::Action),
        ("GETSET", Family::GetSet),
        ("GET", Family::Get),
    ];

    fn of(keyword: &str) -> Option<Family> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| keyword.starts_with(prefix))
            .map(|(_, family)| *family)
    }
}

impl MacroType {
    /// Classify a macro keyword by its shape. Returns `None` for keywords of unknown shape.
    pub fn classify(keyword: &str) -> Option<MacroType> {
        let object = keyword.contains(OBJECT_MARKER);
        let validated = keyword.contains(VALIDATE_MARKER);

        let macro_type = match Family::of(keyword)? {
            Family::Get if object => MacroType::ObjectReadOnly,
            Family::Get if validated => MacroType::ValidatedReadOnly,
            Family::Get => MacroType::ScalarReadOnly,
            Family::GetSet if object => MacroType::ObjectReadWrite,
            Family::GetSet if validated => MacroType::ValidatedReadWrite,
            Family::GetSet => MacroType::ScalarReadWrite,
            Family::Vector if object => MacroType::VectorObject,
            Family::Vector => MacroType::Vector,
            Family::Set if object => MacroType::SetObject,
            Family::Set => MacroType::Set,
            Family::Map if object => MacroType::MapObject,
            Family::Map => MacroType::Map,
            Family::OrderedMap if object => MacroType::OrderedMapObject,
            Family::OrderedMap => MacroType::OrderedMap,
            Family::Manager => MacroType::Manager,
            Family::Action if keyword.contains(ARGUMENT_MARKER) => MacroType::ActionWithArgument,
            Family::Action => MacroType::Action,
        };
        Some(macro_type)
    }

    pub fn category(self) -> MacroCategory {
        match self {
            MacroType::NoMacro => MacroCategory::None,
            MacroType::ScalarReadOnly
            | MacroType::ScalarReadWrite
            | MacroType::ValidatedReadOnly
            | MacroType::ValidatedReadWrite
            | MacroType::ObjectReadOnly
            | MacroType::ObjectReadWrite => MacroCategory::Scalar,
            MacroType::Vector
            | MacroType::VectorObject
            | MacroType::Set
            | MacroType::SetObject
            | MacroType::Map
            | MacroType::MapObject
            | MacroType::OrderedMap
            | MacroType::OrderedMapObject => MacroCategory::Collection,
            MacroType::Manager => MacroCategory::Manager,
            MacroType::Action | MacroType::ActionWithArgument => MacroCategory::Action,
        }
    }

    /// Accessors the category can generate at all.
    ///
    /// Getter-only categories cap a request at `ReadOnly`, actions (invoked, never read)
    /// cap it at `WriteOnly`.
    pub fn capability(self) -> AccessMode {
        match self {
            MacroType::ScalarReadOnly
            | MacroType::ValidatedReadOnly
            | MacroType::ObjectReadOnly
            | MacroType::Manager => AccessMode::ReadOnly,
            MacroType::Action | MacroType::ActionWithArgument => AccessMode::WriteOnly,
            _ => AccessMode::ReadWrite,
        }
    }

    pub fn is_collection(self) -> bool {
        self.category() == MacroCategory::Collection
    }

    pub fn is_map(self) -> bool {
        matches!(
            self,
            MacroType::Map | MacroType::MapObject | MacroType::OrderedMap | MacroType::OrderedMapObject
        )
    }

    pub fn is_object(self) -> bool {
        matches!(
            self,
            MacroType::ObjectReadOnly
                | MacroType::ObjectReadWrite
                | MacroType::VectorObject
                | MacroType::SetObject
                | MacroType::MapObject
                | MacroType::OrderedMapObject
                | MacroType::Manager
        )
    }

    pub fn is_validated(self) -> bool {
        matches!(
            self,
            MacroType::ValidatedReadOnly | MacroType::ValidatedReadWrite
        )
    }

    pub fn is_manager(self) -> bool {
        self == MacroType::Manager
    }

    pub fn is_action(self) -> bool {
        self.category() == MacroCategory::Action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_keywords() {
        assert_eq!(MacroType::classify("GETSET"), Some(MacroType::ScalarReadWrite));
        assert_eq!(MacroType::classify("GET"), Some(MacroType::ScalarReadOnly));
        assert_eq!(
            MacroType::classify("GETSET_VALIDATE"),
            Some(MacroType::ValidatedReadWrite)
        );
        assert_eq!(
            MacroType::classify("GET_SPTR_NULL"),
            Some(MacroType::ObjectReadOnly)
        );
    }

    #[test]
    fn test_collection_keywords() {
        assert_eq!(MacroType::classify("ORDERED_MAP"), Some(MacroType::OrderedMap));
        assert_eq!(MacroType::classify("MAP_SPTR_R"), Some(MacroType::MapObject));
        assert_eq!(MacroType::classify("VECTOR_SPTR"), Some(MacroType::VectorObject));
        assert_eq!(MacroType::classify("SET"), Some(MacroType::Set));
    }

    #[test]
    fn test_manager_and_action_keywords() {
        assert_eq!(MacroType::classify("MANAGER_SPTR"), Some(MacroType::Manager));
        assert_eq!(MacroType::classify("ACTION"), Some(MacroType::Action));
        assert_eq!(
            MacroType::classify("ACTION_WITH_ARG_SPTR"),
            Some(MacroType::ActionWithArgument)
        );
    }

    #[test]
    fn test_unknown_shape() {
        assert_eq!(MacroType::classify("TODO"), None);
        assert_eq!(MacroType::classify("get"), None);
    }

    #[test]
    fn test_capabilities() {
        assert_eq!(MacroType::ScalarReadOnly.capability(), AccessMode::ReadOnly);
        assert_eq!(MacroType::Manager.capability(), AccessMode::ReadOnly);
        assert_eq!(MacroType::Action.capability(), AccessMode::WriteOnly);
        assert_eq!(MacroType::OrderedMap.capability(), AccessMode::ReadWrite);
        assert_eq!(MacroType::NoMacro.capability(), AccessMode::ReadWrite);
    }

    #[test]
    fn test_predicates() {
        assert!(MacroType::OrderedMapObject.is_map());
        assert!(MacroType::OrderedMapObject.is_object());
        assert!(MacroType::OrderedMapObject.is_collection());
        assert!(!MacroType::Vector.is_map());
        assert!(MacroType::ValidatedReadOnly.is_validated());
        assert!(MacroType::ActionWithArgument.is_action());
        assert!(!MacroType::ScalarReadWrite.is_object());
    }
}
