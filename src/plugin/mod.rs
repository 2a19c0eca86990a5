//! Plugin module - The request/response contract spoken with a transform host.
//!
//! A request is a resource document with an optional `extras` object of
//! option overrides. An empty request asks for the plugin metadata instead.

mod metadata;

pub use metadata::*;

use crate::config::{Config, OPTION_NAMES};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, ErrorKind, Result};
use crate::patch::PatchList;
use crate::resource::Resource;
use crate::transform;
use crate::value::{self, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request key carrying option overrides.
pub const EXTRAS_KEY: &str = "extras";

/// PluginResponse is the transform result sent back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginResponse {
    pub version: String,
    #[serde(rename = "isWhiteOut", alias = "isWhiteout")]
    pub is_whiteout: bool,
    #[serde(default)]
    pub patches: PatchList,
}

/// PluginOutput is whatever a request produces on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PluginOutput {
    Metadata(PluginMetadata),
    Response(PluginResponse),
}

impl PluginOutput {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// PluginErrorType is the machine-readable class of a [`PluginError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginErrorType {
    PluginInvalidIOError,
    PluginInvalidInputError,
    PluginRunError,
}

/// PluginError is reported to the host instead of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}: {error_message}")]
pub struct PluginError {
    #[serde(rename = "type")]
    pub kind: PluginErrorType,
    pub message: String,
    pub error_message: String,
}

impl PluginError {
    pub fn new(
        kind: PluginErrorType,
        message: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        PluginError {
            kind,
            message: message.into(),
            error_message: error_message.into(),
        }
    }

    /// Wraps an engine error that happened while running the plugin.
    pub fn from_run_error(err: &Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::InvalidInput | ErrorKind::Config => PluginErrorType::PluginInvalidInputError,
            ErrorKind::Patch | ErrorKind::Serialization => PluginErrorType::PluginRunError,
        };
        PluginError::new(kind, "error when running plugin", err.to_string())
    }
}

/// KubernetesPlugin applies the built-in Kubernetes transforms.
///
/// Defaults are option values supplied when the plugin starts; the extras of
/// each request override them key by key.
#[derive(Debug, Clone, Default)]
pub struct KubernetesPlugin {
    defaults: BTreeMap<String, String>,
}

impl KubernetesPlugin {
    pub fn new(defaults: BTreeMap<String, String>) -> Self {
        KubernetesPlugin { defaults }
    }

    pub fn metadata(&self) -> &'static PluginMetadata {
        metadata()
    }

    /// Transforms one resource.
    #[tracing::instrument(skip_all, fields(resource = %resource.group_kind(), name = resource.name()))]
    pub fn run(
        &self,
        resource: &Resource,
        extras: &BTreeMap<String, String>,
        diag: &dyn Diagnostics,
    ) -> Result<PluginResponse> {
        let mut options = self.defaults.clone();
        options.extend(extras.iter().map(|(k, v)| (k.clone(), v.clone())));
        let config = Config::from_options(&options, diag)?;

        let decision = transform::decide(resource, &config, diag)?;
        if decision.is_whiteout {
            diag.debug("resource is a whiteout");
        }
        Ok(PluginResponse {
            version: V1.to_string(),
            is_whiteout: decision.is_whiteout,
            patches: decision.patches,
        })
    }

    /// Handles one raw request.
    pub fn handle(
        &self,
        input: &[u8],
        diag: &dyn Diagnostics,
    ) -> Result<PluginOutput, PluginError> {
        let request = value::from_json_slice(input).map_err(|e| {
            PluginError::new(
                PluginErrorType::PluginInvalidIOError,
                "error reading plugin input from input",
                e.to_string(),
            )
        })?;

        let Value::Map(mut map) = request else {
            return Err(PluginError::new(
                PluginErrorType::PluginInvalidInputError,
                "error reading plugin input from input",
                "request is not a JSON object",
            ));
        };
        if map.is_empty() {
            return Ok(PluginOutput::Metadata(self.metadata().clone()));
        }

        let extras = match map.delete(EXTRAS_KEY) {
            Some(raw) => parse_extras(&raw, diag).map_err(|e| {
                PluginError::new(
                    PluginErrorType::PluginInvalidInputError,
                    "error getting extras value string",
                    e.to_string(),
                )
            })?,
            None => BTreeMap::new(),
        };

        let resource = Resource::new(Value::Map(map)).map_err(|e| {
            PluginError::new(
                PluginErrorType::PluginInvalidInputError,
                "error reading resource from plugin input",
                e.to_string(),
            )
        })?;

        self.run(&resource, &extras, diag)
            .map(PluginOutput::Response)
            .map_err(|e| PluginError::from_run_error(&e))
    }
}

/// Reads the `extras` object into option strings.
///
/// A recognized option must have a string value. Other keys are passed
/// through when they are strings and dropped otherwise.
fn parse_extras(raw: &Value, diag: &dyn Diagnostics) -> Result<BTreeMap<String, String>> {
    let map = match raw {
        Value::Null => return Ok(BTreeMap::new()),
        Value::Map(map) => map,
        _ => return Err(Error::invalid_input("extras is not an object")),
    };

    let mut extras = BTreeMap::new();
    for (key, value) in map.iter() {
        match value.as_str() {
            Some(s) => {
                extras.insert(key.clone(), s.to_string());
            }
            None if OPTION_NAMES.contains(&key.as_str()) => {
                return Err(Error::invalid_input(format!(
                    "value {:?} for param {} is not a string",
                    value, key
                )));
            }
            None => diag.debug(&format!("ignoring non-string extra {}", key)),
        }
    }
    Ok(extras)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn handle(
        plugin: &KubernetesPlugin,
        request: serde_json::Value,
    ) -> Result<serde_json::Value, PluginError> {
        let output = plugin.handle(request.to_string().as_bytes(), &RecordingDiagnostics::new())?;
        Ok(serde_json::from_str(&output.to_json().unwrap()).unwrap())
    }

    #[test]
    fn test_empty_request_returns_metadata() {
        let out = handle(&KubernetesPlugin::default(), json!({})).unwrap();
        assert_eq!(out["name"], "KubernetesPlugin");
        assert_eq!(out["optionalFields"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_transform_request() {
        let out = handle(
            &KubernetesPlugin::default(),
            json!({
                "apiVersion": "v1",
                "kind": "Service",
                "metadata": {"name": "web", "uid": "u1"},
                "spec": {"clusterIP": "None"},
                "extras": {"add-annotations": "a=b"}
            }),
        )
        .unwrap();
        assert_eq!(
            out,
            json!({
                "version": "v1",
                "isWhiteOut": false,
                "patches": [
                    {"op": "remove", "path": "/metadata/uid"},
                    {"op": "add", "path": "/metadata/annotations", "value": {}},
                    {"op": "add", "path": "/metadata/annotations/a", "value": "b"}
                ]
            })
        );
    }

    #[test]
    fn test_whiteout_response() {
        let out = handle(
            &KubernetesPlugin::default(),
            json!({"apiVersion": "v1", "kind": "Endpoints", "metadata": {"name": "web"}}),
        )
        .unwrap();
        assert_eq!(out, json!({"version": "v1", "isWhiteOut": true, "patches": []}));
    }

    #[test]
    fn test_extras_override_defaults() {
        let defaults: BTreeMap<String, String> =
            [("include-only".to_string(), "ConfigMap".to_string())].into_iter().collect();
        let plugin = KubernetesPlugin::new(defaults);
        let cm = json!({"apiVersion": "v1", "kind": "ConfigMap", "metadata": {"name": "c"}});

        let out = handle(&plugin, cm.clone()).unwrap();
        assert_eq!(out["isWhiteOut"], false);

        let mut overridden = cm;
        overridden["extras"] = json!({"include-only": "Secret"});
        let out = handle(&plugin, overridden).unwrap();
        assert_eq!(out["isWhiteOut"], true);
    }

    #[test]
    fn test_non_string_recognized_extra_rejected() {
        let err = handle(
            &KubernetesPlugin::default(),
            json!({"apiVersion": "v1", "kind": "Pod", "extras": {"disable-whiteout-owned": true}}),
        )
        .unwrap_err();
        assert_eq!(err.kind, PluginErrorType::PluginInvalidInputError);
        assert!(err.error_message.contains("disable-whiteout-owned"));
    }

    #[test]
    fn test_non_string_unknown_extra_ignored() {
        let out = handle(
            &KubernetesPlugin::default(),
            json!({"apiVersion": "v1", "kind": "ConfigMap", "extras": {"replicas": 3}}),
        )
        .unwrap();
        assert_eq!(out["isWhiteOut"], false);
    }

    #[test]
    fn test_unparseable_input() {
        let err = KubernetesPlugin::default()
            .handle(b"{nope", &RecordingDiagnostics::new())
            .unwrap_err();
        assert_eq!(err.kind, PluginErrorType::PluginInvalidIOError);
    }

    #[test]
    fn test_config_error_reported() {
        let err = handle(
            &KubernetesPlugin::default(),
            json!({"apiVersion": "v1", "kind": "ConfigMap", "extras": {"include-only": ".apps"}}),
        )
        .unwrap_err();
        assert_eq!(err.kind, PluginErrorType::PluginInvalidInputError);
        assert_eq!(err.message, "error when running plugin");
    }

    #[test]
    fn test_run_error_reported() {
        let err = handle(
            &KubernetesPlugin::default(),
            json!({"apiVersion": "v1", "kind": "Service", "spec": {"ports": [{"nodePort": "x"}]}}),
        )
        .unwrap_err();
        assert_eq!(err.kind, PluginErrorType::PluginInvalidInputError);
    }

    #[test]
    fn test_plugin_error_wire_format() {
        let err = PluginError::new(PluginErrorType::PluginRunError, "error when running plugin", "boom");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"type": "PluginRunError", "message": "error when running plugin", "errorMessage": "boom"})
        );
        assert_eq!(err.to_string(), "error when running plugin: boom");
    }

    #[test]
    fn test_response_accepts_either_whiteout_spelling() {
        let a: PluginResponse =
            serde_json::from_value(json!({"version": "v1", "isWhiteOut": true})).unwrap();
        let b: PluginResponse =
            serde_json::from_value(json!({"version": "v1", "isWhiteout": true, "patches": []})).unwrap();
        assert_eq!(a, b);
    }
}
