//! User account types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a registered user (SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A registered user.
///
/// Created at registration and never mutated afterwards. The password hash is
/// opaque to this crate; producing and verifying it is the auth layer's job.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// Opaque password hash supplied by the auth layer.
    pub password_hash: String,
    /// Registration timestamp (Unix epoch seconds).
    pub registration_date: i64,
}
