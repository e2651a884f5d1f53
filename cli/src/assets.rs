//! Embedded static resources compiled into the binary.
//!
//! At compile time, `include_dir!` embeds everything under `assets/`:
//!   - `sshd_config` — shipped to tasks that receive an SSH key pair
//!
//! Lookups go through a process-wide table built once on first use. Call
//! [`preload`] during startup so a broken build fails before any task is
//! rendered.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use include_dir::{Dir, include_dir};
use thiserror::Error;

static EMBEDDED_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

static RESOURCES: LazyLock<BTreeMap<StaticResource, &'static [u8]>> =
    LazyLock::new(|| load_table(&EMBEDDED_ASSETS));

/// Identifier of a packaged resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StaticResource {
    SshdConfig,
}

impl StaticResource {
    pub const ALL: &'static [Self] = &[Self::SshdConfig];

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::SshdConfig => "sshd_config",
        }
    }
}

/// A packaged resource is missing from the build. Never recoverable at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("embedded asset not found: {}", .0.file_name())]
pub struct AssetError(pub StaticResource);

fn load_table(dir: &'static Dir<'static>) -> BTreeMap<StaticResource, &'static [u8]> {
    StaticResource::ALL
        .iter()
        .filter_map(|r| dir.get_file(r.file_name()).map(|f| (*r, f.contents())))
        .collect()
}

fn lookup(
    table: &BTreeMap<StaticResource, &'static [u8]>,
    resource: StaticResource,
) -> Result<&'static [u8], AssetError> {
    table.get(&resource).copied().ok_or(AssetError(resource))
}

/// Raw bytes of a packaged resource.
///
/// # Errors
///
/// Returns [`AssetError`] if the resource was not embedded.
pub fn static_file(resource: StaticResource) -> Result<&'static [u8], AssetError> {
    lookup(&RESOURCES, resource)
}

/// Build the resource table and check that every resource is present.
///
/// # Errors
///
/// Returns the first missing resource.
pub fn preload() -> Result<(), AssetError> {
    for resource in StaticResource::ALL {
        let bytes = static_file(*resource)?;
        tracing::debug!(resource = resource.file_name(), len = bytes.len(), "static resource loaded");
    }
    Ok(())
}

/// Every packaged resource with its bytes, in identifier order.
pub fn all() -> impl Iterator<Item = (StaticResource, &'static [u8])> {
    RESOURCES.iter().map(|(r, b)| (*r, *b))
}
