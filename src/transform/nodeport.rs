//! Node port reconciliation for Services.
//!
//! A node port survives only if the last applied configuration asked for it:
//! named ports are matched by name, unnamed ports by their port number.
//! Everything else was allocated by the source control plane and is dropped.

use super::service::service_type;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::fieldpath::Path;
use crate::patch::PatchList;
use crate::resource::{Resource, LAST_APPLIED_ANNOTATION};
use crate::value::{self, Value};
use std::collections::BTreeSet;

/// Node ports the user set explicitly.
#[derive(Debug, Default, PartialEq, Eq)]
struct ExplicitNodePorts {
    named: BTreeSet<String>,
    unnamed: BTreeSet<i64>,
}

impl ExplicitNodePorts {
    /// Collects explicit node ports from a last-applied document.
    fn from_last_applied(doc: &Value) -> Result<Self> {
        let mut explicit = ExplicitNodePorts::default();
        let Some(ports) = doc
            .lookup(&Path::fields(["spec", "ports"]))
            .and_then(Value::as_list)
        else {
            return Ok(explicit);
        };

        for port in ports.iter().filter(|p| p.is_map()) {
            let Some(node_port) = port.get("nodePort") else {
                continue;
            };
            let node_port = node_port.as_node_port()?;
            if node_port <= 0 {
                continue;
            }
            match port_name(port) {
                Some(name) => {
                    explicit.named.insert(name.to_string());
                }
                None => {
                    explicit.unnamed.insert(node_port);
                }
            }
        }
        Ok(explicit)
    }

    fn keeps(&self, name: Option<&str>, node_port: i64) -> bool {
        match name {
            Some(name) => self.named.contains(name),
            None => self.unnamed.contains(&node_port),
        }
    }
}

/// A port is named when it has a non-empty string `name`.
fn port_name(port: &Value) -> Option<&str> {
    port.get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

/// Emits a `remove` for each live node port that was not explicitly requested.
///
/// Without a readable last-applied annotation no port counts as explicit.
pub(super) fn node_port_patches(resource: &Resource, diag: &dyn Diagnostics) -> Result<PatchList> {
    let mut patches = PatchList::new();
    if service_type(resource) == Some("ExternalName") {
        return Ok(patches);
    }

    let ports_path = Path::fields(["spec", "ports"]);
    let Some(ports) = resource.lookup(&ports_path).and_then(Value::as_list) else {
        return Ok(patches);
    };

    let explicit = match resource.annotation(LAST_APPLIED_ANNOTATION) {
        Some(raw) => match value::from_json(raw) {
            Ok(doc) => ExplicitNodePorts::from_last_applied(&doc)?,
            Err(e) => {
                diag.warn(&format!(
                    "ignoring unparseable {} on {:?}: {}",
                    LAST_APPLIED_ANNOTATION,
                    resource.name(),
                    e
                ));
                ExplicitNodePorts::default()
            }
        },
        None => ExplicitNodePorts::default(),
    };

    for (i, port) in ports.iter().enumerate() {
        if !port.is_map() {
            continue;
        }
        let Some(node_port) = port.get("nodePort") else {
            continue;
        };
        let node_port = node_port.as_node_port()?;
        if node_port == 0 {
            continue;
        }
        if !explicit.keeps(port_name(port), node_port) {
            let path = ports_path.with_index(i).with_field("nodePort");
            diag.debug(&format!("{}: dropping allocated node port {}", path, node_port));
            patches.remove(&path);
        }
    }

    Ok(patches)
}
