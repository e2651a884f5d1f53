//! Filesystem infrastructure — loading configuration and building archives
//! from local directories.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::domain::PrivateAndPublicKeys;
use crate::domain::archive::{Archive, ArchiveItem};

/// Parse a YAML (or JSON) document from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Read an existing key pair from disk.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn load_key_pair(private_key: &Path, public_key: &Path) -> Result<PrivateAndPublicKeys> {
    Ok(PrivateAndPublicKeys {
        private_key: fs::read(private_key)
            .with_context(|| format!("reading private key {}", private_key.display()))?,
        public_key: fs::read(public_key)
            .with_context(|| format!("reading public key {}", public_key.display()))?,
    })
}

/// Build an archive from the contents of `root`, with paths relative to it.
///
/// Entries are visited in sorted order so the same tree always yields the
/// same archive. Directories and executables get mode `0755`, other files
/// `0644`. Symlinks and special files are skipped.
///
/// # Errors
///
/// Returns an error if any directory or file cannot be read.
pub fn archive_from_dir(root: &Path) -> Result<Archive> {
    let mut archive = Archive::new();
    walk(root, root, &mut archive)?;
    Ok(archive)
}

fn walk(root: &Path, dir: &Path, archive: &mut Archive) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("listing {}", dir.display()))?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        let rel = relative_path(root, &path)?;
        let meta = fs::symlink_metadata(&path)
            .with_context(|| format!("stat {}", path.display()))?;
        if meta.is_dir() {
            archive.push(ArchiveItem::dir(rel));
            walk(root, &path, archive)?;
        } else if meta.is_file() {
            let content = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            if is_executable(&meta) {
                archive.push(ArchiveItem::executable(rel, content));
            } else {
                archive.push(ArchiveItem::file(rel, content));
            }
        } else {
            tracing::warn!(path = %path.display(), "skipping non-regular file");
        }
    }
    Ok(())
}

fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;
    let parts = rel
        .components()
        .map(|c| {
            c.as_os_str()
                .to_str()
                .with_context(|| format!("non-UTF-8 path {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    false
}
