//! User account service.
//!
//! Registration and lookup. Password hashing lives in the auth layer; this
//! service stores and returns the hash as an opaque string, so nothing here
//! dictates the algorithm.

use std::sync::Arc;

use crate::models::User;
use crate::storage::StudyBackend;
use crate::{Error, Result, current_timestamp};

/// Service for user registration and lookup.
pub struct AccountService {
    backend: Arc<dyn StudyBackend>,
}

impl AccountService {
    /// Creates a new account service with the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self { backend }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `username` or `password_hash` is empty (`InvalidInput`)
    /// - the username is already taken (`Conflict`)
    /// - storage cannot be accessed
    pub fn register(&self, username: &str, password_hash: &str) -> Result<User> {
        if username.trim().is_empty() {
            return Err(Error::InvalidInput("username must not be empty".to_string()));
        }
        if password_hash.is_empty() {
            return Err(Error::InvalidInput(
                "password hash must not be empty".to_string(),
            ));
        }

        let user = self
            .backend
            .create_user(username.trim(), password_hash, current_timestamp())?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered"
        );

        Ok(user)
    }

    /// Looks a user up by username, for the login path.
    ///
    /// Returns the stored hash for the auth layer to verify; this service
    /// never compares passwords itself.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.backend.get_user_by_username(username.trim())
    }
}
