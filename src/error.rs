//! Crate-wide error type.
//!
//! Module-level errors ([`crate::orchestration::SyncError`],
//! [`crate::config::ConfigurationError`]) stay precise at their seams; this
//! umbrella exists for embedders that want a single error type at the crate
//! boundary.

use thiserror::Error;

use crate::config::ConfigurationError;
use crate::orchestration::SyncError;

#[derive(Debug, Error)]
pub enum RecipientSyncError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, RecipientSyncError>;
