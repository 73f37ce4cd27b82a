//! Auth/session collaborator
//!
//! User records and bearer-token sessions, built on the same connection
//! gate as the node store but with no tree logic. This module owns the
//! record shapes, credential hashing, token generation, input validation
//! and permission normalization; the store wires them to collections.

mod password;
mod validation;

pub use password::{hash_password, verify_password};
pub use validation::{is_valid_username, validate_user, VALID_NAME, VALID_PATH};

use crate::error::StoreError;
use crate::store::contract::PermissionMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Stored user record. The password hash is a self-describing PHC string
/// carrying its own per-user salt and cost parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

/// Stored session record: a bearer token bound to permission scopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub username: String,
    pub token: String,
    pub permissions: PermissionMap,
}

/// Generate a 160-bit random bearer token, base64-encoded.
pub fn generate_token() -> Result<String, StoreError> {
    let mut raw = [0u8; 20];
    getrandom::getrandom(&mut raw)
        .map_err(|e| StoreError::Backend(format!("token generation failed: {}", e)))?;
    Ok(STANDARD.encode(raw))
}

/// Normalize permission scopes to `/scope/` form: a leading and trailing
/// slash, added if missing.
pub fn normalize_permissions(permissions: PermissionMap) -> PermissionMap {
    permissions
        .into_iter()
        .map(|(scope, modes)| {
            let mut normalized = String::with_capacity(scope.len() + 2);
            if !scope.starts_with('/') {
                normalized.push('/');
            }
            normalized.push_str(&scope);
            if !normalized.ends_with('/') {
                normalized.push('/');
            }
            (normalized, modes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generate_token_is_base64_of_160_bits() {
        let token = generate_token().unwrap();
        let raw = STANDARD.decode(&token).unwrap();
        assert_eq!(raw.len(), 20);
        assert_ne!(token, generate_token().unwrap());
    }

    #[test]
    fn test_normalize_permissions_adds_slashes() {
        let mut permissions: PermissionMap = HashMap::new();
        permissions.insert("documents".to_string(), vec!["r".to_string(), "w".to_string()]);
        permissions.insert("/music/".to_string(), vec!["r".to_string()]);
        permissions.insert("photos/".to_string(), vec!["w".to_string()]);

        let normalized = normalize_permissions(permissions);
        assert_eq!(
            normalized.get("/documents/").map(Vec::len),
            Some(2)
        );
        assert_eq!(normalized.get("/music/").map(Vec::len), Some(1));
        assert_eq!(normalized.get("/photos/").map(Vec::len), Some(1));
        assert_eq!(normalized.len(), 3);
    }
}
