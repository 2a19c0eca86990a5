//! Whiteout module - Decides whether a resource is dropped from migration.

use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::resource::{GroupKind, Resource};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Kinds that are always regenerated on the destination cluster.
pub static BUILTIN_WHITEOUTS: Lazy<BTreeSet<GroupKind>> = Lazy::new(|| {
    [
        GroupKind::core("Endpoints"),
        GroupKind::new("discovery.k8s.io", "EndpointSlice"),
        GroupKind::core("PersistentVolumeClaim"),
    ]
    .into_iter()
    .collect()
});

/// Returns true if the resource should be dropped.
///
/// A non-empty include-only list is the only kind filter consulted; otherwise
/// the built-in list and the extra whiteouts apply. Unless disabled, pods and
/// pod-template-bearing resources with owner references are dropped too, as
/// their controller recreates them.
pub fn is_whiteout(resource: &Resource, config: &Config, diag: &dyn Diagnostics) -> bool {
    let gk = resource.group_kind();

    if !config.include_only().is_empty() {
        if !config.include_only().contains(gk) {
            diag.debug(&format!("{} is not in the include-only list", gk));
            return true;
        }
    } else if BUILTIN_WHITEOUTS.contains(gk) {
        diag.debug(&format!("{} is always whited out", gk));
        return true;
    } else if config.extra_whiteouts().contains(gk) {
        diag.debug(&format!("{} is in the extra whiteouts list", gk));
        return true;
    }

    if config.disable_whiteout_owned() {
        return false;
    }

    if resource.shape().has_pod_spec() && !resource.owner_references().is_empty() {
        diag.debug(&format!(
            "{} {:?} is owned by a controller",
            gk,
            resource.name()
        ));
        return true;
    }

    false
}
