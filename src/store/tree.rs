//! Tree maintenance engine
//!
//! Sole writer of folder `children` sets and ancestor `modified` stamps.
//! On write it upserts every ancestor folder root-to-leaf; on delete it
//! prunes empty ancestors and recomputes surviving ancestors' stamps.
//! The multi-level walks are sequential and not transactional: a partial
//! failure leaves ancestors momentarily stale, and a later successful
//! retry repeats the whole chain (every step is idempotent).

use crate::backend::{node_key, Collection};
use crate::error::StoreError;
use crate::path;
use crate::store::NodeDocument;
use crate::types::{ChildEntry, Version};
use tracing::debug;

/// Optimistic concurrency check used by both `put` and `delete`.
///
/// With no supplied version the operation is unconditionally permitted
/// (create-or-force-write). With one, it must equal the stored `modified`
/// exactly; any mismatch, including "node no longer exists", is a
/// conflict. Returns the stored version for the caller's bookkeeping.
pub fn check_version(
    nodes: &Collection<NodeDocument>,
    owner: &str,
    path: &str,
    supplied: Option<Version>,
) -> Result<Option<Version>, StoreError> {
    let stored = nodes
        .find(&node_key(owner, path))?
        .map(|node| node.modified());
    match supplied {
        None => Ok(stored),
        Some(version) if stored == Some(version) => Ok(stored),
        Some(_) => Err(StoreError::Conflict {
            path: path.to_string(),
        }),
    }
}

/// Write-time ancestor propagation: for every ancestor folder from the
/// root to the immediate parent, in that order, upsert the folder with
/// the new stamp and an idempotent child-entry add, then separately stamp
/// that child entry. Runs before the leaf itself is written.
pub fn propagate_write(
    nodes: &Collection<NodeDocument>,
    owner: &str,
    path: &str,
    modified: Version,
) -> Result<(), StoreError> {
    let mut segs = path::segments(path);
    let leaf = match segs.pop() {
        Some(leaf) => leaf,
        None => return Ok(()),
    };
    for level in 0..segs.len() {
        let folder: String = segs[..=level].concat();
        let child = segs
            .get(level + 1)
            .cloned()
            .unwrap_or_else(|| leaf.clone());
        touch_folder(nodes, owner, &folder, &child, modified)?;
        stamp_child(nodes, owner, &folder, &child, modified)?;
    }
    debug!(owner, path, modified, "ancestor chain propagated");
    Ok(())
}

/// Upsert a folder document: set its `modified` and add an entry for the
/// immediate child segment if absent. The add never overwrites an
/// existing entry's stamp; `stamp_child` does that in a second write.
fn touch_folder(
    nodes: &Collection<NodeDocument>,
    owner: &str,
    folder: &str,
    child: &str,
    modified: Version,
) -> Result<(), StoreError> {
    nodes.modify(&node_key(owner, folder), |document| {
        let mut children = match document {
            Some(NodeDocument::Folder { children, .. }) => children,
            _ => Vec::new(),
        };
        if !children.iter().any(|entry| entry.name == child) {
            children.push(ChildEntry {
                name: child.to_string(),
                modified: 0,
            });
        }
        Some(NodeDocument::Folder { modified, children })
    })?;
    Ok(())
}

/// Set one child entry's `modified` stamp.
fn stamp_child(
    nodes: &Collection<NodeDocument>,
    owner: &str,
    folder: &str,
    child: &str,
    modified: Version,
) -> Result<(), StoreError> {
    nodes.modify(&node_key(owner, folder), |document| {
        let mut document = document?;
        if let NodeDocument::Folder { children, .. } = &mut document {
            if let Some(entry) = children.iter_mut().find(|entry| entry.name == child) {
                entry.modified = modified;
            }
        }
        Some(document)
    })?;
    Ok(())
}

/// Remove one entry from a folder's child set.
pub fn pull_child(
    nodes: &Collection<NodeDocument>,
    owner: &str,
    folder: &str,
    child: &str,
) -> Result<(), StoreError> {
    nodes.modify(&node_key(owner, folder), |document| {
        let mut document = document?;
        if let NodeDocument::Folder { children, .. } = &mut document {
            children.retain(|entry| entry.name != child);
        }
        Some(document)
    })?;
    Ok(())
}

/// Delete-time pruning: walk the ancestor chain from the immediate parent
/// toward the root. An empty folder is removed entirely (and pulled from
/// its own parent); a surviving folder gets its `modified` recomputed as
/// the maximum over its remaining children. The full chain is always
/// walked so every surviving ancestor is refreshed. The root is never
/// deleted.
pub fn prune_ancestors(
    nodes: &Collection<NodeDocument>,
    owner: &str,
    path: &str,
) -> Result<(), StoreError> {
    let chain = path::ancestors(path, false);
    for level in 1..chain.len() {
        let folder = &chain[level - 1];
        let parent = &chain[level];
        let children = match nodes.find(&node_key(owner, folder))? {
            Some(NodeDocument::Folder { children, .. }) => children,
            // Already pruned by a concurrent delete, or never existed.
            _ => continue,
        };
        if children.is_empty() {
            nodes.remove(&node_key(owner, folder))?;
            let name = path::basename(folder).unwrap_or_default();
            pull_child(nodes, owner, parent, &name)?;
            debug!(owner, folder = folder.as_str(), "pruned empty folder");
        } else {
            refresh_mtime(nodes, owner, folder, &children)?;
        }
    }
    Ok(())
}

/// Recompute a folder's `modified` as the maximum stored `modified` among
/// its children, re-reading each child node.
fn refresh_mtime(
    nodes: &Collection<NodeDocument>,
    owner: &str,
    folder: &str,
    children: &[ChildEntry],
) -> Result<(), StoreError> {
    let mut newest = 0;
    for child in children {
        let child_path = format!("{}{}", folder, child.name);
        if let Some(node) = nodes.find(&node_key(owner, &child_path))? {
            newest = newest.max(node.modified());
        }
    }
    nodes.modify(&node_key(owner, folder), |document| {
        let mut document = document?;
        document.set_modified(newest);
        Some(document)
    })?;
    Ok(())
}
