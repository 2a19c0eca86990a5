use super::Generator;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::patch::PatchList;
use crate::resource::Resource;
use crate::value::Value;
use std::collections::BTreeMap;

const CONTAINER_SLOTS: [&str; 2] = ["containers", "initContainers"];

/// Rewrites container image registries according to `registry-replacement`.
///
/// Bare Pods are rewritten under `spec`, pod-template-bearing resources under
/// `spec.template.spec`; a resource is only ever one of the two.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRewriter;

impl Generator for ImageRewriter {
    fn name(&self) -> &'static str {
        "image-registry"
    }

    fn generate(
        &self,
        resource: &Resource,
        config: &Config,
        diag: &dyn Diagnostics,
    ) -> Result<PatchList> {
        let mut patches = PatchList::new();
        let replacements = config.registry_replacement();
        if replacements.is_empty() {
            return Ok(patches);
        }
        let Some(pod_spec) = resource.shape().pod_spec_path() else {
            return Ok(patches);
        };

        for slot in CONTAINER_SLOTS {
            let slot_path = pod_spec.with_field(slot);
            let Some(containers) = resource.lookup(&slot_path).and_then(Value::as_list) else {
                continue;
            };
            for (i, container) in containers.iter().enumerate() {
                let Some(image) = container.get("image").and_then(Value::as_str) else {
                    continue;
                };
                if let Some(updated) = replace_registry(replacements, image) {
                    let path = slot_path.with_index(i).with_field("image");
                    diag.debug(&format!("{}: {} -> {}", path, image, updated));
                    patches.add(&path, updated);
                }
            }
        }
        Ok(patches)
    }
}

/// Swaps the registry prefix of `image` using `replacements`.
///
/// A key matches when the reference starts with it; no host or path
/// canonicalization is done. The longest matching key wins. Everything after
/// the prefix, including tag or digest, is kept verbatim.
pub fn replace_registry(replacements: &BTreeMap<String, String>, image: &str) -> Option<String> {
    replacements
        .iter()
        .filter_map(|(prefix, target)| {
            image
                .strip_prefix(prefix.as_str())
                .map(|rest| (prefix, target, rest))
        })
        .max_by_key(|(prefix, _, _)| prefix.len())
        .map(|(_, target, rest)| format!("{}{}", target, rest))
}
