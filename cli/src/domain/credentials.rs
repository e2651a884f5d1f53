//! SSH credential fragment injected into tasks that receive a key pair.
//!
//! The paths and modes below are a fixed contract with the in-container
//! sshd launcher.

use crate::assets::{self, AssetError, StaticResource};
use crate::domain::archive::{Archive, ItemKind};
use crate::domain::user_group::AgentUserGroup;

/// Directory holding every credential file.
pub const SSH_DIR: &str = "/run/determined/ssh";
pub const SSH_DIR_MODE: u32 = 0o700;
/// Public key as read by sshd.
pub const AUTHORIZED_KEYS_FILE: &str = "/run/determined/ssh/authorized_keys";
pub const AUTHORIZED_KEYS_MODE: u32 = 0o644;
pub const PRIV_KEY_FILE: &str = "/run/determined/ssh/id_rsa";
pub const PRIV_KEY_MODE: u32 = 0o600;
pub const PUB_KEY_FILE: &str = "/run/determined/ssh/id_rsa.pub";
pub const PUB_KEY_MODE: u32 = 0o644;
pub const SSHD_CONFIG_FILE: &str = "/run/determined/ssh/sshd_config";
pub const SSHD_CONFIG_MODE: u32 = 0o644;

/// A pre-generated key pair. Key generation happens elsewhere.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateAndPublicKeys {
    pub private_key: Vec<u8>,
    pub public_key: Vec<u8>,
}

impl std::fmt::Debug for PrivateAndPublicKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateAndPublicKeys")
            .field("private_key", &"<redacted>")
            .field("public_key_len", &self.public_key.len())
            .finish()
    }
}

/// Credential entries for `keys`, owned by `owner`. Empty when `keys` is
/// `None`.
///
/// # Errors
///
/// Returns [`AssetError`] if the packaged sshd configuration is missing.
pub fn credential_archive(
    keys: Option<&PrivateAndPublicKeys>,
    owner: &AgentUserGroup,
) -> Result<Archive, AssetError> {
    let Some(keys) = keys else {
        return Ok(Archive::new());
    };
    let sshd_config = assets::static_file(StaticResource::SshdConfig)?;

    Ok(vec![
        owner.owned_archive_item(SSH_DIR, Vec::new(), SSH_DIR_MODE, ItemKind::Directory),
        owner.owned_archive_item(
            AUTHORIZED_KEYS_FILE,
            keys.public_key.clone(),
            AUTHORIZED_KEYS_MODE,
            ItemKind::RegularFile,
        ),
        owner.owned_archive_item(
            PRIV_KEY_FILE,
            keys.private_key.clone(),
            PRIV_KEY_MODE,
            ItemKind::RegularFile,
        ),
        owner.owned_archive_item(
            PUB_KEY_FILE,
            keys.public_key.clone(),
            PUB_KEY_MODE,
            ItemKind::RegularFile,
        ),
        owner.owned_archive_item(
            SSHD_CONFIG_FILE,
            sshd_config.to_vec(),
            SSHD_CONFIG_MODE,
            ItemKind::RegularFile,
        ),
    ]
    .into())
}

/// True for any path inside the credential directory, the directory included.
#[must_use]
pub fn is_credential_path(path: &str) -> bool {
    path == SSH_DIR
        || path
            .strip_prefix(SSH_DIR)
            .is_some_and(|rest| rest.starts_with('/'))
}
