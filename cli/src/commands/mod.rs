//! Command implementations

pub mod assets;
pub mod render;
pub mod version;
