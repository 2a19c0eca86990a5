use super::nodeport::node_port_patches;
use super::Generator;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::fieldpath::Path;
use crate::patch::PatchList;
use crate::resource::{Resource, Shape};
use crate::value::Value;

/// Marker value of a headless service.
const HEADLESS: &str = "None";

/// Drops cluster-assigned addressing from Services.
///
/// `externalIPs` goes for LoadBalancer services, `clusterIP` and
/// `clusterIPs` go unless they mark the service headless, and node ports are
/// reconciled against the last applied configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceSanitizer;

impl Generator for ServiceSanitizer {
    fn name(&self) -> &'static str {
        "service"
    }

    fn generate(
        &self,
        resource: &Resource,
        _config: &Config,
        diag: &dyn Diagnostics,
    ) -> Result<PatchList> {
        let mut patches = PatchList::new();
        if resource.shape() != Shape::Service {
            return Ok(patches);
        }
        let spec = Path::fields(["spec"]);

        let external_ips = spec.with_field("externalIPs");
        if service_type(resource) == Some("LoadBalancer") && resource.has(&external_ips) {
            patches.remove(&external_ips);
        }

        let cluster_ip = spec.with_field("clusterIP");
        if let Some(ip) = resource.lookup(&cluster_ip) {
            if ip.as_str() != Some(HEADLESS) {
                patches.remove(&cluster_ip);
            }
        }

        let cluster_ips = spec.with_field("clusterIPs");
        if let Some(ips) = resource.lookup(&cluster_ips) {
            let headless = ips
                .as_list()
                .and_then(|l| l.first())
                .and_then(Value::as_str)
                == Some(HEADLESS);
            if !headless {
                patches.remove(&cluster_ips);
            }
        }

        patches.extend(node_port_patches(resource, diag)?);
        Ok(patches)
    }
}

/// Returns `spec.type` when it is a string.
pub(super) fn service_type(resource: &Resource) -> Option<&str> {
    resource
        .lookup(&Path::fields(["spec", "type"]))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(spec: serde_json::Value) -> serde_json::Value {
        let doc = json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": {"name": "s"},
            "spec": spec
        });
        let r = Resource::from_json(&doc.to_string()).unwrap();
        let patches = ServiceSanitizer
            .generate(&r, &Config::default(), &RecordingDiagnostics::new())
            .unwrap();
        serde_json::from_str(&patches.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_cluster_ip_removed() {
        assert_eq!(
            run(json!({"type": "ClusterIP", "clusterIP": "10.0.0.1", "clusterIPs": ["10.0.0.1"]})),
            json!([
                {"op": "remove", "path": "/spec/clusterIP"},
                {"op": "remove", "path": "/spec/clusterIPs"}
            ])
        );
    }

    #[test]
    fn test_headless_preserved() {
        assert_eq!(
            run(json!({"type": "ClusterIP", "clusterIP": "None", "clusterIPs": ["None"]})),
            json!([])
        );
    }

    #[test]
    fn test_malformed_cluster_ips_removed() {
        assert_eq!(
            run(json!({"clusterIP": "None", "clusterIPs": "None"})),
            json!([{"op": "remove", "path": "/spec/clusterIPs"}])
        );
        assert_eq!(
            run(json!({"clusterIP": "None", "clusterIPs": []})),
            json!([{"op": "remove", "path": "/spec/clusterIPs"}])
        );
    }

    #[test]
    fn test_load_balancer_external_ips() {
        assert_eq!(
            run(json!({"type": "LoadBalancer", "externalIPs": ["1.2.3.4"]})),
            json!([{"op": "remove", "path": "/spec/externalIPs"}])
        );
        // only LoadBalancer services lose them
        assert_eq!(
            run(json!({"type": "ClusterIP", "externalIPs": ["1.2.3.4"]})),
            json!([])
        );
        // nothing to remove
        assert_eq!(run(json!({"type": "LoadBalancer"})), json!([]));
    }

    #[test]
    fn test_non_service_untouched() {
        let r = Resource::from_json(
            r#"{"apiVersion": "v1", "kind": "ConfigMap", "spec": {"clusterIP": "10.0.0.1"}}"#,
        )
        .unwrap();
        let patches = ServiceSanitizer
            .generate(&r, &Config::default(), &RecordingDiagnostics::new())
            .unwrap();
        assert!(patches.is_empty());
    }
}
