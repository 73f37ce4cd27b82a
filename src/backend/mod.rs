//! Embedded document database boundary.
//!
//! One collection of node documents keyed by `(owner, full_path)`, one
//! collection of user records, one collection of session records. No other
//! schema is assumed; the engine's durability guarantees are its own
//! contract.

mod collection;

pub use collection::Collection;

use crate::config::StoreConfig;
use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

/// Collection of node documents, keyed by `(owner, full_path)`.
pub const NODES: &str = "nodes";
/// Collection of user records, keyed by username.
pub const USERS: &str = "users";
/// Collection of session records, keyed by `(username, token)`.
pub const SESSIONS: &str = "sessions";

/// Cheap-to-clone handle over the shared database.
///
/// Only the connection gate creates these; operations receive clones and
/// never close or replace the underlying engine.
#[derive(Debug, Clone)]
pub struct Database {
    db: sled::Db,
}

impl Database {
    /// Open the database described by `config`.
    ///
    /// Opening touches the filesystem, so it runs on the blocking pool.
    /// Any failure is reported as a connection error.
    pub async fn connect(config: &StoreConfig) -> Result<Database, StoreError> {
        let engine_config = if config.temporary {
            sled::Config::new().temporary(true)
        } else {
            sled::Config::new().path(config.database_path()?)
        };
        let db = tokio::task::spawn_blocking(move || engine_config.open())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        info!(database = %config.database, temporary = config.temporary, "database connected");
        Ok(Database { db })
    }

    /// Open a typed collection by name.
    pub fn collection<T>(&self, name: &str) -> Result<Collection<T>, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let tree = self.db.open_tree(name)?;
        Ok(Collection::new(tree))
    }
}

/// Key for a node document: owner and full path, NUL-separated. Path
/// segments cannot contain NUL (validated upstream), so keys are unique
/// per `(owner, full_path)`.
pub fn node_key(owner: &str, path: &str) -> Vec<u8> {
    compound_key(owner, path)
}

/// Key for a session record: username and token, NUL-separated.
pub fn session_key(username: &str, token: &str) -> Vec<u8> {
    compound_key(username, token)
}

fn compound_key(left: &str, right: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(left.len() + right.len() + 1);
    key.extend_from_slice(left.as_bytes());
    key.push(0);
    key.extend_from_slice(right.as_bytes());
    key
}
