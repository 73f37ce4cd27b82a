//! User-record input validation.

use crate::error::StoreError;
use crate::store::contract::NewUser;
use once_cell::sync::Lazy;
use regex::Regex;

/// Well-formed path: `/` followed by validated segments.
pub static VALID_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/([a-zA-Z0-9%._-]+/?)*$").expect("path pattern is valid"));

/// Valid name characters for usernames and path segments.
pub static VALID_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9%._-]+$").expect("name pattern is valid"));

static VALID_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.+@.+\..+$").expect("email pattern is valid"));

/// Whether a username is acceptable: valid name characters and not a
/// path-traversal token.
pub fn is_valid_username(username: &str) -> bool {
    if username == ".." {
        return false;
    }
    VALID_NAME.is_match(username)
}

/// Validate user-creation input. The first failed check is reported.
pub fn validate_user(params: &NewUser) -> Result<(), StoreError> {
    if params.username.len() < 2 {
        return Err(StoreError::Validation(
            "Username must be at least 2 characters long".to_string(),
        ));
    }
    if !is_valid_username(&params.username) {
        return Err(StoreError::Validation(
            "Usernames may only contain letters, numbers, dots, dashes and underscores"
                .to_string(),
        ));
    }
    if params.email.is_empty() {
        return Err(StoreError::Validation("Email must not be blank".to_string()));
    }
    if !VALID_EMAIL.is_match(&params.email) {
        return Err(StoreError::Validation("Email is not valid".to_string()));
    }
    if params.password.is_empty() {
        return Err(StoreError::Validation(
            "Password must not be blank".to_string(),
        ));
    }
    Ok(())
}
