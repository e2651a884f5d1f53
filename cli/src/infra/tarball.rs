//! Materializes archive fragments as gzip tarballs.
//!
//! Output is deterministic: entries are written in archive order with zeroed
//! timestamps, and the gzip header carries no mtime or file name.

use std::io::Write;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};

use crate::domain::archive::ItemKind;
use crate::domain::compose::{RunArchive, resolve_path};

/// Write `run` as a tar.gz stream to `writer`, with every entry relocated
/// under the fragment's mount root.
///
/// # Errors
///
/// Returns an error if an entry path cannot be encoded or the writer fails.
pub fn write_tar_gz<W: Write>(run: &RunArchive, writer: W) -> Result<W> {
    let encoder = GzEncoder::new(writer, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for item in &run.archive {
        let full = resolve_path(&run.path, &item.path);
        let rel = full.trim_start_matches('/');
        if rel.is_empty() {
            continue;
        }

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(match item.kind {
            ItemKind::Directory => tar::EntryType::Directory,
            ItemKind::RegularFile => tar::EntryType::Regular,
        });
        header.set_mode(item.mode);
        header.set_uid(u64::from(item.uid));
        header.set_gid(u64::from(item.gid));
        header.set_mtime(0);
        header.set_size(item.content.len() as u64);
        builder
            .append_data(&mut header, rel, item.content.as_slice())
            .with_context(|| format!("adding {full} to archive"))?;
    }

    let encoder = builder.into_inner().context("finishing tar stream")?;
    encoder.finish().context("finishing gzip stream")
}

/// The tarball for `run` as bytes.
///
/// # Errors
///
/// See [`write_tar_gz`].
pub fn to_tar_gz(run: &RunArchive) -> Result<Vec<u8>> {
    write_tar_gz(run, Vec::new())
}

/// SHA-256 over every fragment's mount root and tarball, in order.
///
/// Two renders of the same input produce the same digest.
///
/// # Errors
///
/// See [`write_tar_gz`].
pub fn archive_digest(archives: &[RunArchive]) -> Result<String> {
    let mut hasher = Sha256::new();
    for run in archives {
        hasher.update(run.path.as_bytes());
        hasher.update([0u8]);
        hasher.update(to_tar_gz(run)?);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// File name for the `index`-th fragment, e.g. `01-run-determined-workdir.tar.gz`.
#[must_use]
pub fn fragment_file_name(index: usize, run: &RunArchive) -> String {
    let slug = run
        .path
        .trim_matches('/')
        .replace('/', "-");
    let slug = if slug.is_empty() { "root" } else { slug.as_str() };
    format!("{index:02}-{slug}.tar.gz")
}
