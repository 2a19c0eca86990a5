use super::Generator;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::fieldpath::Path;
use crate::patch::PatchList;
use crate::resource::Resource;

/// Server-populated fields that must not be replayed on the destination.
pub const STRIPPED_FIELDS: [&[&str]; 6] = [
    &["metadata", "uid"],
    &["metadata", "selfLink"],
    &["metadata", "resourceVersion"],
    &["metadata", "creationTimestamp"],
    &["metadata", "generation"],
    &["status"],
];

/// Removes [`STRIPPED_FIELDS`] that are present on the resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldStripper;

impl Generator for FieldStripper {
    fn name(&self) -> &'static str {
        "strip-fields"
    }

    fn generate(
        &self,
        resource: &Resource,
        _config: &Config,
        _diag: &dyn Diagnostics,
    ) -> Result<PatchList> {
        let mut patches = PatchList::new();
        for field in STRIPPED_FIELDS {
            let path = Path::fields(field.iter().copied());
            if resource.has(&path) {
                patches.remove(&path);
            }
        }
        Ok(patches)
    }
}
