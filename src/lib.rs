//! # Kube Transform
//!
//! Prepares Kubernetes resources exported from one cluster for import into
//! another.
//!
//! For each resource the engine decides whether it is a whiteout (dropped
//! from the migration) and, if not, which JSON patch operations sanitize it:
//! server-populated fields are stripped, annotations edited, pod scheduling
//! and service addressing reset, and image registries swapped.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON documents
//! - [`fieldpath`] - Paths into a document, rendered as JSON pointers
//! - [`resource`] - Resources, their GroupKind and shape
//! - [`config`] - Typed settings resolved from option strings
//! - [`whiteout`] - The drop/keep decision
//! - [`transform`] - Patch generators and the per-resource decision
//! - [`patch`] - Ordered patch lists and their wire format
//! - [`plugin`] - Request/response contract with a transform host

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fieldpath;
pub mod patch;
pub mod plugin;
pub mod resource;
pub mod transform;
pub mod value;
pub mod whiteout;

pub use config::Config;
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{Error, ErrorKind, Result};
pub use fieldpath::{Path, PathElement};
pub use patch::PatchList;
pub use plugin::{KubernetesPlugin, PluginError, PluginMetadata, PluginResponse};
pub use resource::{GroupKind, Resource, Shape};
pub use transform::{decide, Decision};
pub use value::Value;
