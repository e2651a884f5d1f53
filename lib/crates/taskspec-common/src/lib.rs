//! Command configuration types shared by the task spec renderer, together
//! with the pure translators that turn each configuration section into its
//! execution form.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod command;
pub mod environment;
pub mod error;
pub mod memory;
pub mod mount;
pub mod resources;

pub use command::CommandConfig;
pub use environment::{DeviceType, EnvironmentConfig, EnvironmentExpconf};
pub use error::TranslateError;
pub use memory::{GIB, MemorySize};
pub use mount::{BindMountConfig, BindMountExpconf, Mount, bind_mounts_to_expconf, to_docker_mounts};
pub use resources::{ResourcesConfig, ResourcesExpconf};
