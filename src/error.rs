//! Error types for store operations.
//!
//! Every failure is returned to the immediate caller; nothing is swallowed
//! except outcomes the design treats as non-errors (e.g. deleting a node
//! that is already absent).

use thiserror::Error;

/// Failures surfaced by the store and its collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The connection gate could not establish a database handle.
    /// Every caller waiting on the attempt receives this; the gate resets
    /// so a later call may retry.
    #[error("could not establish database connection: {0}")]
    Connection(String),

    /// Optimistic version check failed on a put/delete. The caller is
    /// expected to re-fetch and retry.
    #[error("version conflict at {path}")]
    Conflict { path: String },

    /// No node exists at the requested path.
    #[error("no node exists at {path}")]
    NotFound { path: String },

    /// Malformed user-record input.
    #[error("{0}")]
    Validation(String),

    /// Any underlying database failure not otherwise classified.
    /// Propagated unchanged; no partial-state rollback is attempted.
    #[error("backend failure: {0}")]
    Backend(String),

    /// Configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Backend(format!("document encoding failed: {}", err))
    }
}
