//! Archive composition — anchoring archive fragments at mount roots.

use serde::{Deserialize, Serialize};

use crate::domain::archive::Archive;

/// Working directory of the task inside the container. User files land here.
pub const CONTAINER_WORK_DIR: &str = "/run/determined/workdir";
/// Mount root for platform-supplied files, whose paths are absolute.
pub const ROOT_DIR: &str = "/";

/// An archive plus the container directory it is extracted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunArchive {
    pub path: String,
    pub archive: Archive,
}

impl RunArchive {
    /// Absolute in-container path of every entry, in archive order.
    pub fn resolved_paths(&self) -> impl Iterator<Item = String> + '_ {
        self.archive
            .iter()
            .map(move |item| resolve_path(&self.path, &item.path))
    }
}

/// Anchor `archive` at `path`. Entry paths are cleaned with
/// [`clean_entry_path`], so no entry can climb out of its mount root.
#[must_use]
pub fn wrap_archive(archive: Archive, path: impl Into<String>) -> RunArchive {
    let archive = archive
        .into_iter()
        .map(|mut item| {
            item.path = clean_entry_path(&item.path);
            item
        })
        .collect();
    RunArchive {
        path: path.into(),
        archive,
    }
}

/// Path segments with `.` and empty segments dropped and `..` applied.
/// A `..` at the top is discarded rather than leaving the root.
fn clamped_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}

/// Lexically clean an entry path, keeping a leading `/` if present.
///
/// `../../etc/x` becomes `etc/x` and `/a/./b/../c` becomes `/a/c`.
#[must_use]
pub fn clean_entry_path(path: &str) -> String {
    let joined = clamped_segments(path).join("/");
    if path.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Join an entry path onto its mount root. Absolute entry paths are treated
/// as relative to the root, so `/` + `/etc/x` is `/etc/x`, and `..` never
/// resolves above the root.
#[must_use]
pub fn resolve_path(root: &str, item_path: &str) -> String {
    let rel = clamped_segments(item_path).join("/");
    let root = root.trim_end_matches('/');
    if rel.is_empty() {
        if root.is_empty() {
            "/".to_string()
        } else {
            root.to_string()
        }
    } else {
        format!("{root}/{rel}")
    }
}

/// Final manifest: fragments in the order given. Colliding paths are not
/// detected here; the runtime extracts fragments in order.
#[must_use]
pub fn compose(fragments: impl IntoIterator<Item = RunArchive>) -> Vec<RunArchive> {
    fragments.into_iter().collect()
}
