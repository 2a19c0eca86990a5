//! Config module - Resolves flat string options into typed settings.
//!
//! Options arrive as a `name -> string` map, either from command line flags
//! or from the `extras` of a plugin request.

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::resource::GroupKind;
use std::collections::{BTreeMap, BTreeSet};

pub const ADD_ANNOTATIONS: &str = "add-annotations";
pub const REMOVE_ANNOTATIONS: &str = "remove-annotations";
pub const REGISTRY_REPLACEMENT: &str = "registry-replacement";
pub const EXTRA_WHITEOUTS: &str = "extra-whiteouts";
pub const INCLUDE_ONLY: &str = "include-only";
pub const DISABLE_WHITEOUT_OWNED: &str = "disable-whiteout-owned";

/// Every option name this plugin understands.
pub const OPTION_NAMES: [&str; 6] = [
    ADD_ANNOTATIONS,
    REMOVE_ANNOTATIONS,
    REGISTRY_REPLACEMENT,
    EXTRA_WHITEOUTS,
    INCLUDE_ONLY,
    DISABLE_WHITEOUT_OWNED,
];

/// Config holds the resolved, immutable transform settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    add_annotations: BTreeMap<String, String>,
    remove_annotations: BTreeSet<String>,
    registry_replacement: BTreeMap<String, String>,
    extra_whiteouts: BTreeSet<GroupKind>,
    include_only: BTreeSet<GroupKind>,
    disable_whiteout_owned: bool,
}

impl Config {
    /// Resolves a config from option strings.
    ///
    /// Empty values count as unset and unknown names are ignored. An
    /// unparseable `disable-whiteout-owned` falls back to `false`.
    pub fn from_options(
        options: &BTreeMap<String, String>,
        diag: &dyn Diagnostics,
    ) -> Result<Config> {
        let mut config = Config::default();

        for (name, raw) in options {
            if raw.is_empty() {
                continue;
            }
            match name.as_str() {
                ADD_ANNOTATIONS => config.add_annotations = parse_map(name, raw)?,
                REMOVE_ANNOTATIONS => config.remove_annotations = parse_list(raw).collect(),
                REGISTRY_REPLACEMENT => config.registry_replacement = parse_map(name, raw)?,
                EXTRA_WHITEOUTS => config.extra_whiteouts = parse_group_kinds(name, raw)?,
                INCLUDE_ONLY => config.include_only = parse_group_kinds(name, raw)?,
                DISABLE_WHITEOUT_OWNED => {
                    config.disable_whiteout_owned = parse_bool(raw).unwrap_or_else(|| {
                        diag.warn(&format!(
                            "option {} has non-boolean value {:?}, using false",
                            name, raw
                        ));
                        false
                    })
                }
                _ => diag.debug(&format!("ignoring unknown option {}", name)),
            }
        }

        Ok(config)
    }

    /// Returns a builder for assembling a config directly.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn add_annotations(&self) -> &BTreeMap<String, String> {
        &self.add_annotations
    }

    pub fn remove_annotations(&self) -> &BTreeSet<String> {
        &self.remove_annotations
    }

    pub fn registry_replacement(&self) -> &BTreeMap<String, String> {
        &self.registry_replacement
    }

    pub fn extra_whiteouts(&self) -> &BTreeSet<GroupKind> {
        &self.extra_whiteouts
    }

    pub fn include_only(&self) -> &BTreeSet<GroupKind> {
        &self.include_only
    }

    pub fn disable_whiteout_owned(&self) -> bool {
        self.disable_whiteout_owned
    }
}

/// ConfigBuilder assembles a [`Config`] without going through option strings.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn add_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.add_annotations.insert(key.into(), value.into());
        self
    }

    pub fn remove_annotation(mut self, key: impl Into<String>) -> Self {
        self.config.remove_annotations.insert(key.into());
        self
    }

    pub fn registry_replacement(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.config.registry_replacement.insert(from.into(), to.into());
        self
    }

    pub fn extra_whiteout(mut self, gk: GroupKind) -> Self {
        self.config.extra_whiteouts.insert(gk);
        self
    }

    pub fn include_only(mut self, gk: GroupKind) -> Self {
        self.config.include_only.insert(gk);
        self
    }

    pub fn disable_whiteout_owned(mut self, disable: bool) -> Self {
        self.config.disable_whiteout_owned = disable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Splits a comma separated list, trimming entries and dropping empty ones.
fn parse_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parses `k1=v1,k2=v2`. Each entry splits at its first `=`.
fn parse_map(option: &str, raw: &str) -> Result<BTreeMap<String, String>> {
    parse_list(raw)
        .map(|entry| match entry.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => {
                Ok((k.trim().to_string(), v.trim().to_string()))
            }
            _ => Err(Error::config(
                option,
                format!("expected key=value, got {:?}", entry),
            )),
        })
        .collect()
}

fn parse_group_kinds(option: &str, raw: &str) -> Result<BTreeSet<GroupKind>> {
    parse_list(raw)
        .map(|entry| GroupKind::parse(&entry).map_err(|e| Error::config(option, e.to_string())))
        .collect()
}

/// Accepts the same spellings as Go's `strconv.ParseBool`.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
