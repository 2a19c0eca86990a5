//! Patch module - Ordered JSON patch lists produced by the transforms.
//!
//! Operations are only ever appended. Nothing here reorders, merges or
//! deduplicates them; the list is applied by the host exactly as emitted.

use crate::error::{Error, Result};
use crate::fieldpath::Path;
use json_patch::{AddOperation, Patch, PatchOperation, RemoveOperation};
use serde::{Deserialize, Serialize};

/// PatchList is an append-only sequence of patch operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchList {
    ops: Vec<PatchOperation>,
}

impl PatchList {
    /// Creates an empty list.
    pub fn new() -> Self {
        PatchList { ops: Vec::new() }
    }

    /// Appends a `remove` of `path`.
    pub fn remove(&mut self, path: &Path) {
        self.ops.push(PatchOperation::Remove(RemoveOperation {
            path: path.to_pointer(),
        }));
    }

    /// Appends an `add` of `value` at `path`.
    ///
    /// On an existing member `add` replaces it, which is how images are
    /// rewritten in place.
    pub fn add(&mut self, path: &Path, value: impl Into<serde_json::Value>) {
        self.ops.push(PatchOperation::Add(AddOperation {
            path: path.to_pointer(),
            value: value.into(),
        }));
    }

    /// Appends every operation of `other`, keeping its order.
    pub fn extend(&mut self, other: PatchList) {
        self.ops.extend(other.ops);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatchOperation> {
        self.ops.iter()
    }

    /// Checks that each operation is an `add` or `remove` below the root.
    pub fn validate(&self) -> Result<()> {
        for (i, op) in self.ops.iter().enumerate() {
            let path = match op {
                PatchOperation::Add(AddOperation { path, .. }) => path,
                PatchOperation::Remove(RemoveOperation { path }) => path,
                other => {
                    return Err(Error::patch(format!(
                        "operation {} is not add or remove: {:?}",
                        i, other
                    )))
                }
            };
            if path.is_root() {
                return Err(Error::patch(format!(
                    "operation {} targets the document root",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Serializes the list to its JSON wire form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a JSON wire list and validates it.
    pub fn from_json(json: &str) -> Result<PatchList> {
        let list: PatchList = serde_json::from_str(json)?;
        list.validate()?;
        Ok(list)
    }

    /// Converts into a `json_patch::Patch` that can be applied to a document.
    pub fn into_patch(self) -> Patch {
        Patch(self.ops)
    }
}

impl IntoIterator for PatchList {
    type Item = PatchOperation;
    type IntoIter = std::vec::IntoIter<PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> PatchList {
        let mut list = PatchList::new();
        list.remove(&Path::fields(["metadata", "uid"]));
        list.add(
            &Path::fields(["metadata", "annotations", "example.com/owner"]),
            "team-a",
        );
        list.remove(&Path::fields(["spec", "ports"]).with_index(1).with_field("nodePort"));
        list
    }

    #[test]
    fn test_wire_format() {
        let wire: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(
            wire,
            json!([
                {"op": "remove", "path": "/metadata/uid"},
                {"op": "add", "path": "/metadata/annotations/example.com~1owner", "value": "team-a"},
                {"op": "remove", "path": "/spec/ports/1/nodePort"}
            ])
        );
    }

    #[test]
    fn test_serialize_then_parse_preserves_sequence() {
        let list = sample();
        let parsed = PatchList::from_json(&list.to_json().unwrap()).unwrap();
        assert_eq!(parsed, list);
    }

    #[test]
    fn test_extend_keeps_order_and_duplicates() {
        let mut a = PatchList::new();
        a.remove(&Path::fields(["spec", "nodeName"]));
        let mut b = PatchList::new();
        b.remove(&Path::fields(["spec", "nodeName"]));
        b.remove(&Path::fields(["spec", "priority"]));
        a.extend(b);

        let paths: Vec<String> = a
            .iter()
            .map(|op| match op {
                PatchOperation::Remove(r) => r.path.to_string(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(paths, vec!["/spec/nodeName", "/spec/nodeName", "/spec/priority"]);
    }

    #[test]
    fn test_root_path_rejected() {
        let mut list = PatchList::new();
        list.remove(&Path::new());
        assert_eq!(list.validate().unwrap_err().kind(), ErrorKind::Patch);
    }

    #[test]
    fn test_unsupported_op_rejected() {
        let err = PatchList::from_json(r#"[{"op": "test", "path": "/a", "value": 1}]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Patch);
    }

    #[test]
    fn test_applies_to_document() {
        let mut doc = json!({
            "metadata": {"uid": "123", "annotations": {}},
            "spec": {"ports": [{"port": 80}, {"port": 81, "nodePort": 31000}]}
        });
        json_patch::patch(&mut doc, &sample().into_patch().0).unwrap();
        assert_eq!(
            doc,
            json!({
                "metadata": {"annotations": {"example.com/owner": "team-a"}},
                "spec": {"ports": [{"port": 80}, {"port": 81}]}
            })
        );
    }
}
