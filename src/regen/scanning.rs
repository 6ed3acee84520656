//! Lexical scanning
//!
//! Two cursors share this module:
//!
//! - [`Scanner`] walks logos tokens of a declaration source. It is what the extractor
//!   uses to find namespaces, enum declarations and the comments trailing each member.
//! - [`TextCursor`] walks the inside of a single comment, where macro invocations and
//!   `@@` attributes live. Comments are opaque to the token lexer, so they get their own
//!   character level cursor.
//!
//! Both report absolute byte offsets; [`SourceLocation`] turns those into the row and
//! column used by error messages.

pub mod location;
pub mod scanner;
pub mod text;
pub mod tokens;

pub use location::{Position, SourceLocation};
pub use scanner::{Comment, Scanner};
pub use text::{split_arguments, Argument, Leading, TextCursor, ATTRIBUTE_MARKER};
pub use tokens::{tokenize_with_spans, Token};
