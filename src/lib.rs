//! # regen-core
//!
//! Building blocks for code generators that keep annotated sources and generated files in step:
//!
//! - extract a typed property model from enum declarations whose members carry
//!   comment-encoded macros and `@@` attributes ([`regen::extraction`])
//! - merge freshly generated files into existing ones, region by region, under the control
//!   of comment-embedded directive tags ([`regen::merging`])
//!
//! Everything lives under the [`regen`] module; the `regen` binary wraps it for the
//! command line.

pub mod regen;
