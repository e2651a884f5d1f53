//! Infrastructure layer — filesystem access and archive materialization.

pub mod fs;
pub mod tarball;
