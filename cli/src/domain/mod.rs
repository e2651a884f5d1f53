//! Domain layer — pure task rendering logic and types.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `std::fs`, `std::process`, or `std::net`. All functions are synchronous
//! and take data in, returning data out.

pub mod archive;
pub mod command;
pub mod compose;
pub mod credentials;
pub mod error;
pub mod task;
pub mod user_group;

pub use archive::{Archive, ArchiveItem, ItemKind};
pub use command::{COMMAND_DESCRIPTION, CommandSpec};
pub use compose::{CONTAINER_WORK_DIR, ROOT_DIR, RunArchive};
pub use credentials::PrivateAndPublicKeys;
pub use error::RenderError;
pub use task::TaskSpec;
pub use user_group::AgentUserGroup;
