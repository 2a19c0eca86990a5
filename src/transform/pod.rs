use super::Generator;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::fieldpath::Path;
use crate::patch::PatchList;
use crate::resource::{Resource, Shape};

/// Scheduling decisions of the source cluster, removed from bare Pods.
const SCHEDULING_FIELDS: [&str; 3] = ["nodeName", "nodeSelector", "priority"];

/// Drops source-cluster scheduling fields from bare Pods.
///
/// Pod templates are left alone; only kind Pod in the core group is touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PodSanitizer;

impl Generator for PodSanitizer {
    fn name(&self) -> &'static str {
        "pod-spec"
    }

    fn generate(
        &self,
        resource: &Resource,
        _config: &Config,
        _diag: &dyn Diagnostics,
    ) -> Result<PatchList> {
        let mut patches = PatchList::new();
        if resource.shape() != Shape::BarePod {
            return Ok(patches);
        }
        let spec = Path::fields(["spec"]);
        for field in SCHEDULING_FIELDS {
            patches.remove(&spec.with_field(field));
        }
        Ok(patches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;

    #[test]
    fn test_bare_pod() {
        let pod = Resource::from_json(
            r#"{"apiVersion": "v1", "kind": "Pod", "spec": {"nodeName": "n1"}}"#,
        )
        .unwrap();
        let patches = PodSanitizer
            .generate(&pod, &Config::default(), &RecordingDiagnostics::new())
            .unwrap();
        assert_eq!(
            patches.to_json().unwrap(),
            r#"[{"op":"remove","path":"/spec/nodeName"},{"op":"remove","path":"/spec/nodeSelector"},{"op":"remove","path":"/spec/priority"}]"#
        );
    }

    #[test]
    fn test_pod_template_untouched() {
        let deploy = Resource::from_json(
            r#"{"apiVersion": "apps/v1", "kind": "Deployment", "spec": {"template": {"spec": {"nodeName": "n1"}}}}"#,
        )
        .unwrap();
        let patches = PodSanitizer
            .generate(&deploy, &Config::default(), &RecordingDiagnostics::new())
            .unwrap();
        assert!(patches.is_empty());
    }
}
