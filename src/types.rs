//! Core types for the path-tree storage backend.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Version: a node's modification stamp, quantized to whole seconds.
///
/// Treated as an opaque, strictly-comparable token for optimistic
/// concurrency, not as a display timestamp.
pub type Version = u64;

/// One entry in a folder's child set, unique by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildEntry {
    /// Path segment of the child; folders retain their trailing `/`.
    pub name: String,
    /// The child's `modified` as of the last write/delete propagation.
    pub modified: Version,
}

/// Current time as a version stamp. Sub-second precision is discarded,
/// so writes within the same second produce the same stamp.
pub fn version_now() -> Version {
    Utc::now().timestamp().max(0) as Version
}
