//! Value module - In-memory representation of YAML/JSON resource documents.
//!
//! Lookups are tolerant: a missing or wrongly-shaped node yields `None`
//! instead of an error.

mod value;

pub use value::*;
