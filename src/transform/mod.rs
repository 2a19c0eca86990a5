//! Transform module - Turns one resource into a whiteout decision and patches.
//!
//! Generators run in a fixed order and their outputs are concatenated:
//! field stripping, annotation edits, pod spec sanitizing, image registry
//! rewriting, then service sanitizing. The first generator error aborts the
//! whole resource.

mod annotations;
mod image;
mod nodeport;
mod pod;
mod service;
mod strip;


pub use annotations::AnnotationEditor;
pub use image::{replace_registry, ImageRewriter};
pub use pod::PodSanitizer;
pub use service::ServiceSanitizer;
pub use strip::{FieldStripper, STRIPPED_FIELDS};

use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::patch::PatchList;
use crate::resource::Resource;
use crate::whiteout;

/// Generator produces patch operations for one concern.
pub trait Generator {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    fn generate(
        &self,
        resource: &Resource,
        config: &Config,
        diag: &dyn Diagnostics,
    ) -> Result<PatchList>;
}

/// Generators in emission order.
const GENERATORS: [&dyn Generator; 5] = [
    &FieldStripper,
    &AnnotationEditor,
    &PodSanitizer,
    &ImageRewriter,
    &ServiceSanitizer,
];

/// Decision is the outcome for one resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    pub is_whiteout: bool,
    pub patches: PatchList,
}

impl Decision {
    fn whiteout() -> Self {
        Decision {
            is_whiteout: true,
            patches: PatchList::new(),
        }
    }
}

/// Decides whether to drop the resource and, if kept, how to patch it.
///
/// A whited-out resource never reaches the generators.
pub fn decide(resource: &Resource, config: &Config, diag: &dyn Diagnostics) -> Result<Decision> {
    if whiteout::is_whiteout(resource, config, diag) {
        return Ok(Decision::whiteout());
    }
    Ok(Decision {
        is_whiteout: false,
        patches: patches(resource, config, diag)?,
    })
}

/// Runs every generator and concatenates their output.
pub fn patches(resource: &Resource, config: &Config, diag: &dyn Diagnostics) -> Result<PatchList> {
    let mut all = PatchList::new();
    for generator in GENERATORS {
        let ops = generator.generate(resource, config, diag)?;
        if !ops.is_empty() {
            diag.debug(&format!("{}: {} operation(s)", generator.name(), ops.len()));
        }
        all.extend(ops);
    }
    all.validate()?;
    Ok(all)
}
