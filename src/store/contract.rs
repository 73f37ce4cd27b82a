//! Storage backend contract.
//!
//! The surface consumed by callers: path-addressed node operations plus
//! the user/session collaborator operations. Implementations accept and
//! return plain structured records.

use crate::error::StoreError;
use crate::types::{ChildEntry, Version};
use async_trait::async_trait;
use std::collections::HashMap;

/// Per-scope permission modes attached to a session, e.g.
/// `"/documents/" -> ["r", "w"]`.
pub type PermissionMap = HashMap<String, Vec<String>>;

/// Input for user creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A file node as returned by `get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub modified: Version,
    pub content_type: String,
    pub value: Vec<u8>,
    /// True iff the stored `modified` equals the version the caller
    /// supplied; callers use this to validate cached copies.
    pub current: bool,
}

/// Result of a `get`: a folder listing or a file document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Folder(Vec<ChildEntry>),
    Document(DocumentView),
}

/// Result of a `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutOutcome {
    /// True iff no leaf existed at the path before this call.
    pub created: bool,
    /// The new version stamp written to the leaf and its ancestors.
    pub modified: Version,
}

/// Result of a `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// False when nothing existed at the path (idempotent delete).
    pub removed: bool,
    /// The version stored before removal, if any.
    pub modified: Option<Version>,
}

/// Path-addressed storage backend.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the node at `path`. Folders yield their children list; files
    /// yield `{modified, type, value}` plus a currency flag against the
    /// supplied version.
    async fn get(
        &self,
        owner: &str,
        path: &str,
        version: Option<Version>,
    ) -> Result<Fetched, StoreError>;

    /// Write a file node, creating missing ancestor folders as a side
    /// effect. A supplied version must equal the stored one exactly;
    /// supplying none is the create-or-force-write path.
    async fn put(
        &self,
        owner: &str,
        path: &str,
        content_type: &str,
        value: Vec<u8>,
        version: Option<Version>,
    ) -> Result<PutOutcome, StoreError>;

    /// Remove a file node and prune any ancestor folders it leaves empty.
    /// Deleting an absent node reports `removed = false`, not an error.
    async fn delete(
        &self,
        owner: &str,
        path: &str,
        version: Option<Version>,
    ) -> Result<DeleteOutcome, StoreError>;

    /// Create a user record; input is validated and the username must be
    /// unclaimed.
    async fn create_user(&self, params: NewUser) -> Result<(), StoreError>;

    /// Check credentials against the stored user record.
    async fn authenticate(&self, username: &str, password: &str) -> Result<(), StoreError>;

    /// Issue a bearer token bound to the given permissions.
    async fn authorize(
        &self,
        username: &str,
        permissions: PermissionMap,
    ) -> Result<String, StoreError>;

    /// Invalidate a session token. Revoking an unknown token is a no-op.
    async fn revoke_access(&self, username: &str, token: &str) -> Result<(), StoreError>;

    /// Permissions attached to a session, with scopes normalized to
    /// `/scope/` form. An unknown session yields an empty map.
    async fn permissions(
        &self,
        username: &str,
        token: &str,
    ) -> Result<PermissionMap, StoreError>;
}
