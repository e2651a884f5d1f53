//! Command task rendering — pure functions, no I/O, no async.
//!
//! `CommandSpec::to_task_spec` turns a command configuration plus its file
//! archives into a finished [`TaskSpec`]. The only resource it touches is the
//! process-wide static file table.

use std::collections::BTreeMap;

use taskspec_common::{CommandConfig, bind_mounts_to_expconf, to_docker_mounts};

use crate::domain::archive::Archive;
use crate::domain::compose::{CONTAINER_WORK_DIR, ROOT_DIR, wrap_archive};
use crate::domain::credentials::{PrivateAndPublicKeys, credential_archive};
use crate::domain::error::RenderError;
use crate::domain::task::TaskSpec;

/// Description tag carried by every command task.
pub const COMMAND_DESCRIPTION: &str = "cmd";

/// Everything needed to render a command task.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    pub base: TaskSpec,
    pub config: CommandConfig,
    /// Files supplied by the user, relative to the working directory.
    pub user_files: Archive,
    /// Files supplied by the platform, with absolute paths.
    pub additional_files: Archive,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl CommandSpec {
    /// Render the task.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Asset`] if the packaged sshd configuration is
    /// missing and [`RenderError::Translate`] if a configuration section is
    /// malformed.
    pub fn to_task_spec(
        &self,
        keys: Option<&PrivateAndPublicKeys>,
        task_token: &str,
    ) -> Result<TaskSpec, RenderError> {
        let mut res = self.base.clone();
        res.task_token = task_token.to_string();

        let owner = &self.base.agent_user_group;
        let mut additional_files = self.additional_files.clone();
        let credentials = credential_archive(keys, owner)?;
        tracing::debug!(
            has_token = !task_token.is_empty(),
            has_keys = keys.is_some(),
            credential_entries = credentials.len(),
            user_entries = self.user_files.len(),
            additional_entries = additional_files.len(),
            "rendering command task"
        );
        additional_files.append(credentials);

        res.archives = res.make_archives(vec![
            wrap_archive(owner.own_archive(&self.user_files), CONTAINER_WORK_DIR),
            wrap_archive(owner.own_archive(&additional_files), ROOT_DIR),
        ]);

        res.description = COMMAND_DESCRIPTION.to_string();
        res.entrypoint.clone_from(&self.config.entrypoint);
        res.environment = Some(self.config.environment.to_expconf()?);
        res.env_vars = res.make_env_vars(None);
        res.mounts = to_docker_mounts(&bind_mounts_to_expconf(&self.config.bind_mounts)?);

        if let Some(shm) = self.config.resources.shm_size_bytes()? {
            res.shm_size = shm;
        }

        res.resources_config = Some(self.config.resources.to_expconf()?);

        tracing::debug!(
            fragments = res.archives.len(),
            mounts = res.mounts.len(),
            shm_size = res.shm_size,
            "command task rendered"
        );
        Ok(res)
    }
}
