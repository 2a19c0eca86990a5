//! Self-description returned for capability discovery.

use crate::config;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Protocol version spoken by this plugin.
pub const V1: &str = "v1";

/// Name reported in the plugin metadata.
pub const PLUGIN_NAME: &str = "KubernetesPlugin";

/// OptionalField documents one option a plugin accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalField {
    pub flag_name: String,
    pub help: String,
    pub example: String,
}

/// PluginMetadata describes the plugin and the options it recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
    pub request_version: Vec<String>,
    pub response_version: Vec<String>,
    pub optional_fields: Vec<OptionalField>,
}

static METADATA: Lazy<PluginMetadata> = Lazy::new(|| PluginMetadata {
    name: PLUGIN_NAME.to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    request_version: vec![V1.to_string()],
    response_version: vec![V1.to_string()],
    optional_fields: vec![
        field(
            config::ADD_ANNOTATIONS,
            "Annotations to add to each resource",
            "annotation1=value1,annotation2=value2",
        ),
        field(
            config::REGISTRY_REPLACEMENT,
            "Map of image registry paths to swap on transform, in the format original-registry1=target-registry1,original-registry2=target-registry2...",
            "docker-registry.default.svc:5000=image-registry.openshift-image-registry.svc:5000,docker.io/foo=quay.io/bar",
        ),
        field(
            config::REMOVE_ANNOTATIONS,
            "Annotations to remove",
            "annotation1,annotation2",
        ),
        field(
            config::DISABLE_WHITEOUT_OWNED,
            "Disable whiting out owned pods and pod template resources",
            "true",
        ),
        field(
            config::EXTRA_WHITEOUTS,
            "Additional resources to whiteout specified as a comma-separated list of GroupKind strings.",
            "Deployment.apps,Service,Route.route.openshift.io",
        ),
        field(
            config::INCLUDE_ONLY,
            "If specified, every resource not listed here will be a whiteout. extra-whiteouts is ignored when include-only is specified. Specified as a comma-separated list of GroupKind strings.",
            "Deployment.apps,Service,Route.route.openshift.io",
        ),
    ],
});

fn field(flag_name: &str, help: &str, example: &str) -> OptionalField {
    OptionalField {
        flag_name: flag_name.to_string(),
        help: help.to_string(),
        example: example.to_string(),
    }
}

/// Returns the metadata of the Kubernetes transform plugin.
pub fn metadata() -> &'static PluginMetadata {
    &METADATA
}
