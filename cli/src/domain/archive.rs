//! Archive model — ordered filesystem entries to be materialized in a
//! container.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `std::fs`, or `std::process`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Mode given to directories.
pub const DIR_MODE: u32 = 0o755;
/// Mode given to regular, non-executable files.
pub const FILE_MODE: u32 = 0o644;
/// Mode given to executable files.
pub const EXEC_MODE: u32 = 0o755;

/// Entry type of an archive item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    RegularFile,
    Directory,
}

/// One filesystem entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveItem {
    pub path: String,
    #[serde(
        serialize_with = "serialize_content",
        deserialize_with = "deserialize_content",
        default
    )]
    pub content: Vec<u8>,
    pub mode: u32,
    pub kind: ItemKind,
    pub uid: u32,
    pub gid: u32,
}

impl ArchiveItem {
    /// An entry owned by uid/gid 0. Callers are expected to pass it through
    /// an ownership wrap before it reaches a task.
    #[must_use]
    pub fn new(path: impl Into<String>, content: Vec<u8>, mode: u32, kind: ItemKind) -> Self {
        Self {
            path: path.into(),
            content,
            mode,
            kind,
            uid: 0,
            gid: 0,
        }
    }

    #[must_use]
    pub fn dir(path: impl Into<String>) -> Self {
        Self::new(path, Vec::new(), DIR_MODE, ItemKind::Directory)
    }

    #[must_use]
    pub fn file(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::new(path, content.into(), FILE_MODE, ItemKind::RegularFile)
    }

    #[must_use]
    pub fn executable(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::new(path, content.into(), EXEC_MODE, ItemKind::RegularFile)
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == ItemKind::Directory
    }
}

// Content is elided so private keys never end up in logs.
impl std::fmt::Debug for ArchiveItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveItem")
            .field("path", &self.path)
            .field("content_len", &self.content.len())
            .field("mode", &format_args!("{:#o}", self.mode))
            .field("kind", &self.kind)
            .field("uid", &self.uid)
            .field("gid", &self.gid)
            .finish()
    }
}

fn serialize_content<S: Serializer>(content: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&STANDARD.encode(content))
}

fn deserialize_content<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(d)?;
    STANDARD
        .decode(encoded.as_bytes())
        .map_err(serde::de::Error::custom)
}

/// Ordered sequence of entries. Order is preserved by every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Archive(Vec<ArchiveItem>);

impl Archive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[ArchiveItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveItem> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, item: ArchiveItem) {
        self.0.push(item);
    }

    /// Append every entry of `other`, keeping its order.
    pub fn append(&mut self, other: Archive) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn find(&self, path: &str) -> Option<&ArchiveItem> {
        self.0.iter().find(|i| i.path == path)
    }
}

impl From<Vec<ArchiveItem>> for Archive {
    fn from(items: Vec<ArchiveItem>) -> Self {
        Self(items)
    }
}

impl FromIterator<ArchiveItem> for Archive {
    fn from_iter<I: IntoIterator<Item = ArchiveItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Archive {
    type Item = ArchiveItem;
    type IntoIter = std::vec::IntoIter<ArchiveItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = &'a ArchiveItem;
    type IntoIter = std::slice::Iter<'a, ArchiveItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
