//! Agent user/group and the ownership wrap applied to archive entries.

use serde::{Deserialize, Serialize};

use crate::domain::archive::{Archive, ArchiveItem, ItemKind};

/// Identity that owns every file the agent writes into a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentUserGroup {
    pub user: String,
    pub uid: u32,
    pub group: String,
    pub gid: u32,
}

impl Default for AgentUserGroup {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            uid: 0,
            group: "root".to_string(),
            gid: 0,
        }
    }
}

impl AgentUserGroup {
    /// Build one entry owned by this user/group.
    #[must_use]
    pub fn owned_archive_item(
        &self,
        path: impl Into<String>,
        content: Vec<u8>,
        mode: u32,
        kind: ItemKind,
    ) -> ArchiveItem {
        ArchiveItem {
            path: path.into(),
            content,
            mode,
            kind,
            uid: self.uid,
            gid: self.gid,
        }
    }

    /// Copy of `archive` with every entry owned by this user/group. Path,
    /// content, mode and kind are untouched.
    #[must_use]
    pub fn own_archive(&self, archive: &Archive) -> Archive {
        archive
            .iter()
            .map(|item| {
                self.owned_archive_item(item.path.clone(), item.content.clone(), item.mode, item.kind)
            })
            .collect()
    }

    /// True when every entry of `archive` is owned by this user/group.
    #[must_use]
    pub fn owns(&self, archive: &Archive) -> bool {
        archive
            .iter()
            .all(|i| i.uid == self.uid && i.gid == self.gid)
    }
}
