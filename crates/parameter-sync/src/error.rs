//! Error types for the parameter sync service.

use thiserror::Error;

/// Errors returned by [`crate::service::SyncHandle`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SyncError {
    /// The reconciler task has stopped and no longer accepts commands.
    #[error("parameter sync service stopped")]
    ServiceStopped,
}

/// Result type for parameter sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
