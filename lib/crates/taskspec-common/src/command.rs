//! Command configuration as submitted by the user.

use serde::{Deserialize, Deserializer, Serialize};

use crate::environment::EnvironmentConfig;
use crate::mount::BindMountConfig;
use crate::resources::ResourcesConfig;

/// Shell used to run an entrypoint given as a single string.
pub const ENTRYPOINT_SHELL: [&str; 2] = ["/bin/sh", "-c"];

/// Configuration of a command task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Argument vector. A single string in the source file is wrapped in
    /// `/bin/sh -c`.
    #[serde(deserialize_with = "deserialize_entrypoint")]
    pub entrypoint: Vec<String>,
    pub environment: EnvironmentConfig,
    pub bind_mounts: Vec<BindMountConfig>,
    pub resources: ResourcesConfig,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntrypointRepr {
    Shell(String),
    Argv(Vec<String>),
}

fn deserialize_entrypoint<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match EntrypointRepr::deserialize(deserializer)? {
        EntrypointRepr::Shell(cmd) => ENTRYPOINT_SHELL
            .iter()
            .map(ToString::to_string)
            .chain(std::iter::once(cmd))
            .collect(),
        EntrypointRepr::Argv(argv) => argv,
    })
}
