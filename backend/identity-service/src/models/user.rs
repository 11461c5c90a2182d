use crate::error::Result;
use crate::security::{hash_password, verify_password};
use grpc_jwt_auth::Role;
use std::fmt;

/// User model - core identity entity
///
/// Holds an Argon2id verifier, never the raw password. Immutable once created.
#[derive(Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Create a user, hashing `password` with a fresh salt
    pub fn new(username: impl Into<String>, password: &str, role: Role) -> Result<Self> {
        Ok(Self {
            username: username.into(),
            password_hash: hash_password(password)?,
            role,
        })
    }

    pub fn is_correct_password(&self, password: &str) -> Result<bool> {
        verify_password(password, &self.password_hash)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}
