//! Integration tests for the auth/session collaborator.

use anyhow::Result;
use std::collections::HashMap;
use stowage::store::{DocumentStore, NewUser, PermissionMap, Store};
use stowage::{StoreConfig, StoreError};

fn test_store() -> DocumentStore {
    DocumentStore::new(StoreConfig {
        temporary: true,
        ..StoreConfig::default()
    })
}

fn alice() -> NewUser {
    NewUser {
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "opensesame".to_string(),
    }
}

#[tokio::test]
async fn create_then_authenticate() -> Result<()> {
    let store = test_store();
    store.create_user(alice()).await?;

    store.authenticate("alice", "opensesame").await?;
    assert!(matches!(
        store.authenticate("alice", "wrong").await,
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.authenticate("nobody", "opensesame").await,
        Err(StoreError::Validation(_))
    ));
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_rejected() -> Result<()> {
    let store = test_store();
    store.create_user(alice()).await?;

    let result = store.create_user(alice()).await;
    assert!(matches!(result, Err(StoreError::Validation(_))));

    // The original record is untouched.
    store.authenticate("alice", "opensesame").await?;
    Ok(())
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_write() {
    let store = test_store();
    let result = store
        .create_user(NewUser {
            username: "a".to_string(),
            email: "a@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await;
    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[tokio::test]
async fn authorize_then_fetch_normalized_permissions() -> Result<()> {
    let store = test_store();
    store.create_user(alice()).await?;

    let mut scopes: PermissionMap = HashMap::new();
    scopes.insert("documents".to_string(), vec!["r".to_string(), "w".to_string()]);
    scopes.insert("/music/".to_string(), vec!["r".to_string()]);

    let token = store.authorize("alice", scopes).await?;
    assert!(!token.is_empty());

    let permissions = store.permissions("alice", &token).await?;
    assert_eq!(
        permissions.get("/documents/"),
        Some(&vec!["r".to_string(), "w".to_string()])
    );
    assert_eq!(permissions.get("/music/"), Some(&vec!["r".to_string()]));
    assert_eq!(permissions.len(), 2);
    Ok(())
}

#[tokio::test]
async fn unknown_session_yields_empty_permissions() -> Result<()> {
    let store = test_store();
    let permissions = store.permissions("alice", "no-such-token").await?;
    assert!(permissions.is_empty());
    Ok(())
}

#[tokio::test]
async fn revoke_access_invalidates_the_session() -> Result<()> {
    let store = test_store();
    store.create_user(alice()).await?;

    let mut scopes: PermissionMap = HashMap::new();
    scopes.insert("documents".to_string(), vec!["r".to_string()]);
    let token = store.authorize("alice", scopes).await?;

    store.revoke_access("alice", &token).await?;
    assert!(store.permissions("alice", &token).await?.is_empty());

    // Revoking again is a no-op.
    store.revoke_access("alice", &token).await?;
    Ok(())
}

#[tokio::test]
async fn sessions_are_scoped_per_user() -> Result<()> {
    let store = test_store();
    store.create_user(alice()).await?;

    let mut scopes: PermissionMap = HashMap::new();
    scopes.insert("documents".to_string(), vec!["r".to_string()]);
    let token = store.authorize("alice", scopes).await?;

    // The same token under a different username resolves to nothing.
    assert!(store.permissions("bob", &token).await?.is_empty());
    Ok(())
}
