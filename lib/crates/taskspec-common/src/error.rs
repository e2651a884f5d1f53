//! Translation errors raised while converting configuration into its
//! execution form.

use thiserror::Error;

/// A configuration value that cannot be expressed in execution form.
///
/// These are caller configuration errors. The renderer passes them through
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("environment variable {0:?} must have the form KEY=VALUE")]
    MalformedEnvVar(String),

    #[error("bind mount {field} must be an absolute path (got: {path:?})")]
    RelativeMountPath { field: &'static str, path: String },

    #[error("unknown bind mount propagation {0:?}")]
    UnknownPropagation(String),

    #[error("device {0:?} must have the form host_path:container_path[:mode]")]
    MalformedDevice(String),

    #[error("invalid memory size {0:?}")]
    MalformedMemorySize(String),

    #[error("memory size {0:?} does not fit in a signed 64-bit byte count")]
    MemorySizeOverflow(String),

    #[error("slots must not be negative (got: {0})")]
    NegativeSlots(i64),

    #[error("max_slots ({max}) must be at least slots ({slots})")]
    MaxSlotsBelowSlots { slots: i64, max: i64 },
}
