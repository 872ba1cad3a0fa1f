//! Crate-wide error type.

use crate::config::ConfigError;
use crate::database::TablesError;
use crate::patch::PatchError;
use crate::resolver::ResolveError;
use thiserror::Error;

/// Any error raised while setting up or running insurance resolution.
#[derive(Debug, Error)]
pub enum InsuranceError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database tables error: {0}")]
    Tables(#[from] TablesError),

    #[error("Patch failed: {0}")]
    Patch(#[from] PatchError),

    #[error("Resolve failed: {0}")]
    Resolve(#[from] ResolveError),
}
