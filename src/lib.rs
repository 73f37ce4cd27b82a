//! Stowage: path-tree storage backend
//!
//! Maps a per-user hierarchical path namespace (files and folders) onto
//! documents in an embedded database while preserving filesystem-like
//! invariants: folders know their children, folder modification times
//! reflect the newest descendant, optimistic concurrency prevents lost
//! updates, and deleting the last child of a folder prunes the folder
//! itself, recursively.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod gate;
pub mod logging;
pub mod path;
pub mod store;
pub mod types;

pub use config::StoreConfig;
pub use error::StoreError;
pub use store::contract::Store;
pub use store::DocumentStore;
