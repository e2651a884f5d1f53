//! Task specification: the base template a deployment configures once, and
//! the fully rendered descriptor handed to the container runtime.
//!
//! Both are the same type. A base template is a `TaskSpec` whose rendered
//! fields (`description`, `entrypoint`, `archives`, ...) are still empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use taskspec_common::{EnvironmentExpconf, GIB, Mount, ResourcesExpconf};

use crate::domain::archive::{Archive, ItemKind};
use crate::domain::compose::{self, ROOT_DIR, RunArchive};
use crate::domain::user_group::AgentUserGroup;

/// Shared-memory size used when neither template nor command overrides it.
pub const DEFAULT_SHM_SIZE: i64 = 4 * GIB;
/// Where the master's TLS certificate is written when one is configured.
pub const MASTER_CERT_FILE: &str = "/run/determined/etc/master.crt";
pub const MASTER_CERT_MODE: u32 = 0o644;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSpec {
    pub cluster_id: String,
    pub master_host: String,
    pub master_port: u16,
    pub use_tls: bool,
    /// PEM-encoded certificate tasks use to verify the master.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_cert: Option<String>,
    pub agent_user_group: AgentUserGroup,
    /// Deployment-wide variables added to every task.
    pub extra_env_vars: BTreeMap<String, String>,
    /// Shared-memory size in bytes.
    pub shm_size: i64,
    pub task_token: String,

    pub description: String,
    pub entrypoint: Vec<String>,
    pub environment: Option<EnvironmentExpconf>,
    pub env_vars: BTreeMap<String, String>,
    pub mounts: Vec<Mount>,
    pub resources_config: Option<ResourcesExpconf>,
    pub archives: Vec<RunArchive>,
}

impl Default for TaskSpec {
    fn default() -> Self {
        Self {
            cluster_id: String::new(),
            master_host: "localhost".to_string(),
            master_port: 8080,
            use_tls: false,
            master_cert: None,
            agent_user_group: AgentUserGroup::default(),
            extra_env_vars: BTreeMap::new(),
            shm_size: DEFAULT_SHM_SIZE,
            task_token: String::new(),
            description: String::new(),
            entrypoint: Vec::new(),
            environment: None,
            env_vars: BTreeMap::new(),
            mounts: Vec::new(),
            resources_config: None,
            archives: Vec::new(),
        }
    }
}

impl TaskSpec {
    #[must_use]
    pub fn master_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.master_host, self.master_port)
    }

    /// Variables every task receives, then the deployment extras, then
    /// `overrides`. Later sources win.
    #[must_use]
    pub fn make_env_vars(
        &self,
        overrides: Option<&BTreeMap<String, String>>,
    ) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::from([
            ("DET_CLUSTER_ID".to_string(), self.cluster_id.clone()),
            ("DET_MASTER".to_string(), self.master_url()),
            ("DET_MASTER_HOST".to_string(), self.master_host.clone()),
            ("DET_MASTER_PORT".to_string(), self.master_port.to_string()),
            ("DET_USE_TLS".to_string(), self.use_tls.to_string()),
            ("DET_TASK_TOKEN".to_string(), self.task_token.clone()),
        ]);
        if self.master_cert.is_some() {
            vars.insert("DET_MASTER_CERT_FILE".to_string(), MASTER_CERT_FILE.to_string());
        }
        vars.extend(self.extra_env_vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(overrides) = overrides {
            vars.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        vars
    }

    /// Platform fragments this template always ships, followed by
    /// `fragments` in order.
    #[must_use]
    pub fn make_archives(&self, fragments: Vec<RunArchive>) -> Vec<RunArchive> {
        let base = self.master_cert.as_ref().map(|cert| {
            let owner = &self.agent_user_group;
            let archive: Archive = vec![owner.owned_archive_item(
                MASTER_CERT_FILE,
                cert.clone().into_bytes(),
                MASTER_CERT_MODE,
                ItemKind::RegularFile,
            )]
            .into();
            compose::wrap_archive(archive, ROOT_DIR)
        });
        compose::compose(base.into_iter().chain(fragments))
    }
}
