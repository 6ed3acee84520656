//! Typed property model
//!
//! The extractor turns annotated enum declarations into these types; template expansion
//! (accessors, factories, bridge bindings) reads them. See [`MacroType`] for how macro
//! keywords map onto argument layouts and accessor capabilities.

pub mod access;
pub mod descriptor;
pub mod macro_type;

pub use access::AccessMode;
pub use descriptor::{ClassKind, EnumClassDescriptor, PropertyDescriptor};
pub use macro_type::{MacroCategory, MacroType};
