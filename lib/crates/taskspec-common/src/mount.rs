//! Bind mounts: configuration form, execution form, and the runtime's mount
//! representation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// Propagation mode used when the configuration does not name one.
pub const DEFAULT_PROPAGATION: &str = "rprivate";

const PROPAGATIONS: &[&str] = &["private", "rprivate", "shared", "rshared", "slave", "rslave"];

/// A bind mount as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindMountConfig {
    pub host_path: String,
    pub container_path: String,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub propagation: Option<String>,
}

/// A validated bind mount with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindMountExpconf {
    pub host_path: String,
    pub container_path: String,
    pub read_only: bool,
    pub propagation: String,
}

impl BindMountConfig {
    pub fn to_expconf(&self) -> Result<BindMountExpconf, TranslateError> {
        require_absolute("host_path", &self.host_path)?;
        require_absolute("container_path", &self.container_path)?;
        let propagation = match &self.propagation {
            Some(p) if PROPAGATIONS.contains(&p.as_str()) => p.clone(),
            Some(p) => return Err(TranslateError::UnknownPropagation(p.clone())),
            None => DEFAULT_PROPAGATION.to_string(),
        };
        Ok(BindMountExpconf {
            host_path: self.host_path.clone(),
            container_path: self.container_path.clone(),
            read_only: self.read_only,
            propagation,
        })
    }
}

fn require_absolute(field: &'static str, path: &str) -> Result<(), TranslateError> {
    if Path::new(path).is_absolute() {
        Ok(())
    } else {
        Err(TranslateError::RelativeMountPath {
            field,
            path: path.to_string(),
        })
    }
}

/// Translate a list of bind mounts, stopping at the first invalid one.
pub fn bind_mounts_to_expconf(
    mounts: &[BindMountConfig],
) -> Result<Vec<BindMountExpconf>, TranslateError> {
    mounts.iter().map(BindMountConfig::to_expconf).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountType {
    Bind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindOptions {
    pub propagation: String,
}

/// Mount entry in the container runtime's own representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    #[serde(rename = "type")]
    pub kind: MountType,
    pub source: String,
    pub target: String,
    pub read_only: bool,
    pub bind_options: BindOptions,
}

/// Convert validated bind mounts into runtime mounts, preserving order.
#[must_use]
pub fn to_docker_mounts(mounts: &[BindMountExpconf]) -> Vec<Mount> {
    mounts
        .iter()
        .map(|m| Mount {
            kind: MountType::Bind,
            source: m.host_path.clone(),
            target: m.container_path.clone(),
            read_only: m.read_only,
            bind_options: BindOptions {
                propagation: m.propagation.clone(),
            },
        })
        .collect()
}
