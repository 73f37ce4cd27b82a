//! Node store
//!
//! Path-addressed get/put/delete over the shared database, each guarded by
//! an optimistic version check. Structural updates (ancestor folders,
//! child sets, pruning) are delegated to the tree maintenance engine; this
//! module is the sole writer of a leaf's type, value and stamp.

pub mod contract;
pub mod tree;

use crate::auth;
use crate::backend::{self, node_key, session_key, Collection, Database};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::gate::ConnectionGate;
use crate::path;
use crate::types::{version_now, ChildEntry, Version};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub use contract::{
    DeleteOutcome, DocumentView, Fetched, NewUser, PermissionMap, PutOutcome, Store,
};

/// One document per path, keyed by `(owner, full_path)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeDocument {
    File {
        modified: Version,
        content_type: String,
        value: Vec<u8>,
    },
    Folder {
        modified: Version,
        children: Vec<ChildEntry>,
    },
}

impl NodeDocument {
    pub fn modified(&self) -> Version {
        match self {
            NodeDocument::File { modified, .. } => *modified,
            NodeDocument::Folder { modified, .. } => *modified,
        }
    }

    pub fn set_modified(&mut self, version: Version) {
        match self {
            NodeDocument::File { modified, .. } => *modified = version,
            NodeDocument::Folder { modified, .. } => *modified = version,
        }
    }
}

/// Document-database-backed store.
///
/// Every operation first resolves the shared connection through the gate
/// (suspending until it is ready) and then works against the collections.
pub struct DocumentStore {
    gate: Arc<ConnectionGate>,
}

impl DocumentStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            gate: Arc::new(ConnectionGate::new(config)),
        }
    }

    /// The shared database handle, for collaborators that need direct
    /// collection access. Suspends until the connection is established.
    pub async fn database(&self) -> Result<Database, StoreError> {
        self.gate.acquire().await
    }

    fn nodes(database: &Database) -> Result<Collection<NodeDocument>, StoreError> {
        database.collection(backend::NODES)
    }
}

#[async_trait]
impl Store for DocumentStore {
    async fn get(
        &self,
        owner: &str,
        path: &str,
        version: Option<Version>,
    ) -> Result<Fetched, StoreError> {
        let database = self.gate.acquire().await?;
        let nodes = Self::nodes(&database)?;
        let node = nodes
            .find(&node_key(owner, path))?
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })?;
        match node {
            NodeDocument::Folder { children, .. } => Ok(Fetched::Folder(children)),
            NodeDocument::File {
                modified,
                content_type,
                value,
            } => Ok(Fetched::Document(DocumentView {
                modified,
                content_type,
                value,
                current: version == Some(modified),
            })),
        }
    }

    async fn put(
        &self,
        owner: &str,
        path: &str,
        content_type: &str,
        value: Vec<u8>,
        version: Option<Version>,
    ) -> Result<PutOutcome, StoreError> {
        // Only file nodes are written directly; folder documents are owned
        // by the tree maintenance engine, and overwriting one here would
        // destroy its child set.
        if path::is_folder(path) {
            return Err(StoreError::Validation(
                "cannot write a document at a folder path".to_string(),
            ));
        }
        let database = self.gate.acquire().await?;
        let nodes = Self::nodes(&database)?;
        tree::check_version(&nodes, owner, path, version)?;

        let modified = version_now();
        tree::propagate_write(&nodes, owner, path, modified)?;
        let previous = nodes.upsert(
            &node_key(owner, path),
            &NodeDocument::File {
                modified,
                content_type: content_type.to_string(),
                value,
            },
        )?;
        let created = previous.is_none();
        debug!(owner, path, modified, created, "node written");
        Ok(PutOutcome { created, modified })
    }

    async fn delete(
        &self,
        owner: &str,
        path: &str,
        version: Option<Version>,
    ) -> Result<DeleteOutcome, StoreError> {
        let database = self.gate.acquire().await?;
        let nodes = Self::nodes(&database)?;
        let stored = tree::check_version(&nodes, owner, path, version)?;

        if !nodes.remove(&node_key(owner, path))? {
            // Nothing to remove: idempotent-delete semantics.
            return Ok(DeleteOutcome {
                removed: false,
                modified: stored,
            });
        }
        if let (Some(parent), Some(name)) = (path::parent(path), path::basename(path)) {
            tree::pull_child(&nodes, owner, &parent, &name)?;
            tree::prune_ancestors(&nodes, owner, path)?;
        }
        debug!(owner, path, "node removed");
        Ok(DeleteOutcome {
            removed: true,
            modified: stored,
        })
    }

    async fn create_user(&self, params: NewUser) -> Result<(), StoreError> {
        auth::validate_user(&params)?;
        let database = self.gate.acquire().await?;
        let users: Collection<auth::UserRecord> = database.collection(backend::USERS)?;

        let password_hash = auth::hash_password(&params.password)?;
        let record = auth::UserRecord {
            username: params.username.clone(),
            password_hash,
            email: params.email,
        };
        if !users.create(params.username.as_bytes(), &record)? {
            return Err(StoreError::Validation(
                "The username is already taken".to_string(),
            ));
        }
        debug!(username = %params.username, "user created");
        Ok(())
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let database = self.gate.acquire().await?;
        let users: Collection<auth::UserRecord> = database.collection(backend::USERS)?;
        let record = users
            .find(username.as_bytes())?
            .ok_or_else(|| StoreError::Validation("Username not found".to_string()))?;
        if auth::verify_password(&record.password_hash, password) {
            Ok(())
        } else {
            Err(StoreError::Validation("Incorrect password".to_string()))
        }
    }

    async fn authorize(
        &self,
        username: &str,
        permissions: PermissionMap,
    ) -> Result<String, StoreError> {
        let token = auth::generate_token()?;
        let database = self.gate.acquire().await?;
        let sessions: Collection<auth::SessionRecord> = database.collection(backend::SESSIONS)?;
        sessions.upsert(
            &session_key(username, &token),
            &auth::SessionRecord {
                username: username.to_string(),
                token: token.clone(),
                permissions,
            },
        )?;
        debug!(username, "session issued");
        Ok(token)
    }

    async fn revoke_access(&self, username: &str, token: &str) -> Result<(), StoreError> {
        let database = self.gate.acquire().await?;
        let sessions: Collection<auth::SessionRecord> = database.collection(backend::SESSIONS)?;
        sessions.remove(&session_key(username, token))?;
        Ok(())
    }

    async fn permissions(
        &self,
        username: &str,
        token: &str,
    ) -> Result<PermissionMap, StoreError> {
        let database = self.gate.acquire().await?;
        let sessions: Collection<auth::SessionRecord> = database.collection(backend::SESSIONS)?;
        match sessions.find(&session_key(username, token))? {
            Some(session) => Ok(auth::normalize_permissions(session.permissions)),
            None => Ok(HashMap::new()),
        }
    }
}
