//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator.

use taskspec_common::TranslateError;
use thiserror::Error;

use crate::assets::AssetError;

/// Why a single render call was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The build is missing a packaged resource. Not a per-task problem.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// The command configuration could not be translated.
    #[error(transparent)]
    Translate(#[from] TranslateError),
}
