//! Merge engines
//!
//! Both engines are pure functions of their text inputs: they parse with
//! [`TagParser`](crate::regen::tags::TagParser), decide per region, and render. Nothing is read
//! from or written to disk here.
//!
//! - [`sync`]: merges a whole freshly generated file into the existing one
//! - [`section`]: refreshes a single named section of a hand maintained file

pub mod section;
pub mod sync;

pub use section::{regenerate, SectionRegenerator};
pub use sync::{resolve_mode, sync, Plan, Region, Skeleton, SyncEngine};
