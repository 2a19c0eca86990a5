//! Field path module - Addresses nested fields of a resource document.
//!
//! Paths render both as dotted strings for diagnostics and as JSON pointers
//! for patch operations.

mod path;

pub use path::*;
