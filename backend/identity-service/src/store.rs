/// Credential store
///
/// `UserStore` is the seam between the login handler and wherever identities
/// live. The in-memory implementation is volatile: users are seeded at
/// startup and gone when the process exits.
use crate::error::{IdentityError, Result};
use crate::models::User;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Save a new user; a taken username is `UsernameAlreadyExists`
    async fn save(&self, user: User) -> Result<()>;

    /// Find a user by username, `Ok(None)` if absent
    async fn find(&self, username: &str) -> Result<Option<User>>;
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, user: User) -> Result<()> {
        if user.username.trim().is_empty() {
            return Err(IdentityError::InvalidUsername(
                "Username must not be empty".to_string(),
            ));
        }

        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(IdentityError::UsernameAlreadyExists(user.username));
        }

        info!(username = %user.username, role = %user.role, "User saved");
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().get(username).cloned())
    }
}
