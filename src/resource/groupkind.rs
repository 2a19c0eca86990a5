//! API group and kind identity.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// GroupKind identifies a resource type independent of its API version.
///
/// The core API group is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKind {
    pub group: String,
    pub kind: String,
}

/// ParseGroupKindError describes a malformed `Kind.group` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseGroupKindError {
    #[error("empty kind in {0:?}")]
    EmptyKind(String),

    #[error("empty group after '.' in {0:?}")]
    EmptyGroup(String),

    #[error("whitespace in {0:?}")]
    Whitespace(String),
}

impl GroupKind {
    /// Creates a new GroupKind.
    pub fn new(group: impl Into<String>, kind: impl Into<String>) -> Self {
        GroupKind {
            group: group.into(),
            kind: kind.into(),
        }
    }

    /// Creates a GroupKind in the core API group.
    pub fn core(kind: impl Into<String>) -> Self {
        GroupKind::new("", kind)
    }

    /// Parses the `Kind.group` form, e.g. `Deployment.apps` or `Service`.
    ///
    /// The kind ends at the first dot; everything after it is the group.
    pub fn parse(s: &str) -> Result<Self, ParseGroupKindError> {
        if s.chars().any(char::is_whitespace) {
            return Err(ParseGroupKindError::Whitespace(s.to_string()));
        }
        let (kind, group) = match s.split_once('.') {
            Some((kind, group)) => {
                if group.is_empty() {
                    return Err(ParseGroupKindError::EmptyGroup(s.to_string()));
                }
                (kind, group)
            }
            None => (s, ""),
        };
        if kind.is_empty() {
            return Err(ParseGroupKindError::EmptyKind(s.to_string()));
        }
        Ok(GroupKind::new(group, kind))
    }

    /// Derives a GroupKind from an `apiVersion` and `kind` pair.
    ///
    /// `apps/v1` belongs to group `apps`; a bare version such as `v1` is core.
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        let group = match api_version.rsplit_once('/') {
            Some((group, _version)) => group,
            None => "",
        };
        GroupKind::new(group, kind)
    }

    /// Returns true if this is the given kind in the core group.
    pub fn is_core(&self, kind: &str) -> bool {
        self.group.is_empty() && self.kind == kind
    }
}

impl FromStr for GroupKind {
    type Err = ParseGroupKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupKind::parse(s)
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}.{}", self.kind, self.group)
        }
    }
}
