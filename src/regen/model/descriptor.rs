//! Property model produced by the extractor
//!
//! One [`EnumClassDescriptor`] per enum-style declaration, one [`PropertyDescriptor`] per
//! member. Descriptors are plain values: the extractor builds them, hands them to the caller
//! and never touches them again.

use super::access::AccessMode;
use super::macro_type::MacroType;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// What a declaration describes, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClassKind {
    #[default]
    Object,
    Form,
    ActionArgument,
    Result,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnumClassDescriptor {
    /// Enclosing namespaces joined with `.`, empty for the global scope
    pub namespace: String,
    pub kind: ClassKind,
    pub name: String,
    /// Comment text between the declaration name and its opening brace
    pub raw_command: String,
    pub properties: Vec<PropertyDescriptor>,
    pub is_json: bool,
    pub json_attributes: Map<String, Value>,
    pub inherit_class: Option<String>,
    pub is_log_independent: bool,
    pub is_action_manager_independent: bool,
    pub is_thread_manager_independent: bool,
}

impl EnumClassDescriptor {
    /// Fully qualified name, `namespace.Name` or just `Name`.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn property(&self, enum_name: &str) -> Option<&PropertyDescriptor> {
        self.properties
            .iter()
            .find(|property| property.enum_name == enum_name)
    }

    /// Members that carry a recognized macro.
    pub fn macro_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|property| property.has_macro())
    }

    pub fn has_actions(&self) -> bool {
        self.properties
            .iter()
            .any(|property| property.macro_type.is_action())
    }

    pub fn has_managers(&self) -> bool {
        self.properties
            .iter()
            .any(|property| property.macro_type.is_manager())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyDescriptor {
    pub enum_name: String,
    pub enum_ordinal: i64,
    /// Verbatim macro invocation, empty when the member has none
    pub raw_macro: String,
    pub macro_type: MacroType,
    pub type1: String,
    /// Value type of map-shaped macros
    pub type2: String,
    pub property_name: String,
    pub default_value: String,
    pub validate: Option<String>,
    /// Access asked for by `@@ReadOnly`, `@@WriteOnly` or `@@NoAccess`
    pub requested_access: AccessMode,
    pub is_inherited: bool,
    pub initialize_arguments: Vec<String>,
    pub is_no_history: bool,
    pub redo_result: Option<String>,
    pub undo_result: Option<String>,
    pub is_no_json: bool,
    pub json_attributes: Map<String, Value>,
    /// Free text not consumed by the macro or by attributes
    pub raw_command: String,
}

impl PropertyDescriptor {
    pub fn new(enum_name: impl Into<String>, enum_ordinal: i64) -> Self {
        Self {
            enum_name: enum_name.into(),
            enum_ordinal,
            ..Self::default()
        }
    }

    pub fn has_macro(&self) -> bool {
        self.macro_type != MacroType::NoMacro
    }

    /// Effective accessors: the request narrowed by what the macro category supports.
    pub fn access_mode(&self) -> AccessMode {
        self.requested_access.restrict(self.macro_type.capability())
    }
}

impl Serialize for PropertyDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PropertyDescriptor", 19)?;
        state.serialize_field("enum_name", &self.enum_name)?;
        state.serialize_field("enum_ordinal", &self.enum_ordinal)?;
        state.serialize_field("raw_macro", &self.raw_macro)?;
        state.serialize_field("macro_type", &self.macro_type)?;
        state.serialize_field("type1", &self.type1)?;
        state.serialize_field("type2", &self.type2)?;
        state.serialize_field("property_name", &self.property_name)?;
        state.serialize_field("default_value", &self.default_value)?;
        state.serialize_field("validate", &self.validate)?;
        state.serialize_field("requested_access", &self.requested_access)?;
        state.serialize_field("access_mode", &self.access_mode())?;
        state.serialize_field("is_inherited", &self.is_inherited)?;
        state.serialize_field("initialize_arguments", &self.initialize_arguments)?;
        state.serialize_field("is_no_history", &self.is_no_history)?;
        state.serialize_field("redo_result", &self.redo_result)?;
        state.serialize_field("undo_result", &self.undo_result)?;
        state.serialize_field("is_no_json", &self.is_no_json)?;
        state.serialize_field("json_attributes", &self.json_attributes)?;
        state.serialize_field("raw_command", &self.raw_command)?;
        state.end()
    }
}
