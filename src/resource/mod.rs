//! Resource module - Kubernetes objects as untyped documents.
//!
//! Resources are identified by [`GroupKind`] and classified once into a
//! [`Shape`] that decides which kind-specific transforms apply.

mod groupkind;
mod resource;

pub use groupkind::*;
pub use resource::*;
