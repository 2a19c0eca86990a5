use super::Generator;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::fieldpath::Path;
use crate::patch::PatchList;
use crate::resource::Resource;
use crate::value::Value;

/// Adds and removes `metadata.annotations` entries.
///
/// Adds come first. When the resource has no annotations map one is created
/// before the first add. Removals are emitted whether or not the key exists;
/// removing a missing annotation is a no-op for the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationEditor;

impl Generator for AnnotationEditor {
    fn name(&self) -> &'static str {
        "annotations"
    }

    fn generate(
        &self,
        resource: &Resource,
        config: &Config,
        _diag: &dyn Diagnostics,
    ) -> Result<PatchList> {
        let mut patches = PatchList::new();
        let metadata = Path::fields(["metadata"]);
        let annotations = metadata.with_field("annotations");

        if !config.add_annotations().is_empty() {
            if !resource.lookup(&metadata).is_some_and(Value::is_map) {
                patches.add(&metadata, serde_json::json!({}));
            }
            if !resource.lookup(&annotations).is_some_and(Value::is_map) {
                patches.add(&annotations, serde_json::json!({}));
            }
            for (key, value) in config.add_annotations() {
                patches.add(&annotations.with_field(key.as_str()), value.as_str());
            }
        }

        for key in config.remove_annotations() {
            patches.remove(&annotations.with_field(key.as_str()));
        }

        Ok(patches)
    }
}
