//! Annotation model extraction
//!
//! Reads a declaration source and produces one [`EnumClassDescriptor`] per enum-style
//! declaration:
//!
//!     namespace ui {
//!     enum class WidgetProperty // @@Json
//!     {
//!         Title,  // GETSET(std::wstring, Title, L"untitled")
//!         Items,  // VECTOR_SPTR(Item, Items) @@NoHistory
//!     };
//!     }
//!
//! The work is split in three layers:
//!
//! - [`declarations`]: namespaces, declarations, members and ordinals
//! - [`macros`]: the macro keyword registry and positional argument slots
//! - [`attributes`]: `@@` attributes and their JSON payloads
//!
//! Parsing is fail fast. The first malformed construct aborts the parse with a
//! [`ParserError`](crate::regen::error::ParserError) and nothing partial is returned.
//!
//! [`EnumClassDescriptor`]: crate::regen::model::EnumClassDescriptor

pub mod attributes;
pub mod declarations;
pub mod macros;

pub use declarations::{parse, ClassKindRules, Extractor};
pub use macros::{MacroRegistry, DEFAULT_MACRO_KEYWORDS};
