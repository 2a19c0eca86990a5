//! A single resource document and its structural classification.

use super::GroupKind;
use crate::error::{Error, Result};
use crate::fieldpath::Path;
use crate::value::{self, Value};
use once_cell::sync::Lazy;

/// Annotation holding the previously applied desired state.
pub const LAST_APPLIED_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

static POD_TEMPLATE_SPEC: Lazy<Path> = Lazy::new(|| Path::fields(["spec", "template", "spec"]));

/// Shape selects which resource-specific generators run.
///
/// It is computed once when the resource is constructed. Bare Pods and
/// Services are recognized by GroupKind; pod-template-bearing workloads are
/// recognized structurally by a map at `spec.template.spec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    BarePod,
    PodTemplate,
    Service,
    Generic,
}

impl Shape {
    /// Returns true if the resource carries a pod spec, bare or templated.
    pub fn has_pod_spec(self) -> bool {
        matches!(self, Shape::BarePod | Shape::PodTemplate)
    }

    /// Returns the path of the pod spec for pod-bearing shapes.
    pub fn pod_spec_path(self) -> Option<Path> {
        match self {
            Shape::BarePod => Some(Path::fields(["spec"])),
            Shape::PodTemplate => Some(POD_TEMPLATE_SPEC.clone()),
            Shape::Service | Shape::Generic => None,
        }
    }
}

/// Resource is one Kubernetes object of arbitrary kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    root: Value,
    group_kind: GroupKind,
    shape: Shape,
}

impl Resource {
    /// Wraps a parsed document. The root must be a map with a string `kind`.
    pub fn new(root: Value) -> Result<Self> {
        let map = root
            .as_map()
            .ok_or_else(|| Error::invalid_input("resource document is not an object"))?;
        let kind = map
            .get("kind")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::invalid_input("resource document has no kind"))?;
        let api_version = map.get("apiVersion").and_then(Value::as_str).unwrap_or("");
        let group_kind = GroupKind::from_api_version(api_version, kind);
        let shape = classify(&root, &group_kind);

        Ok(Resource {
            root,
            group_kind,
            shape,
        })
    }

    /// Parses a resource from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let root = value::from_json(json)
            .map_err(|e| Error::invalid_input(format!("failed to parse JSON: {}", e)))?;
        Resource::new(root)
    }

    /// Parses a resource from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let root = value::from_yaml(yaml)
            .map_err(|e| Error::invalid_input(format!("failed to parse YAML: {}", e)))?;
        Resource::new(root)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn group_kind(&self) -> &GroupKind {
        &self.group_kind
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Resolves `path` against the document.
    pub fn lookup(&self, path: &Path) -> Option<&Value> {
        self.root.lookup(path)
    }

    /// Returns true if `path` is present in the document.
    pub fn has(&self, path: &Path) -> bool {
        self.root.has(path)
    }

    /// Returns `metadata.name`, or an empty string.
    pub fn name(&self) -> &str {
        self.lookup(&Path::fields(["metadata", "name"]))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Returns `metadata.ownerReferences`; empty when absent or not a list.
    pub fn owner_references(&self) -> &[Value] {
        self.lookup(&Path::fields(["metadata", "ownerReferences"]))
            .and_then(Value::as_list)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the string value of annotation `key`.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.lookup(&Path::fields(["metadata", "annotations"]))
            .and_then(|a| a.get(key))
            .and_then(Value::as_str)
    }
}

fn classify(root: &Value, group_kind: &GroupKind) -> Shape {
    if group_kind.is_core("Pod") {
        Shape::BarePod
    } else if group_kind.is_core("Service") {
        Shape::Service
    } else if root.lookup(&POD_TEMPLATE_SPEC).is_some_and(Value::is_map) {
        Shape::PodTemplate
    } else {
        Shape::Generic
    }
}
