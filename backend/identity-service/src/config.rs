//! Identity seeding configuration
//!
//! Identities are created once at startup from `SEED_USERS`, formatted as
//! `username:password:role` entries separated by commas:
//!
//! ```text
//! SEED_USERS=admin1:secret:admin,user1:secret:user
//! ```

use crate::error::{IdentityError, Result};
use crate::models::User;
use crate::store::UserStore;
use grpc_jwt_auth::Role;
use std::fmt;
use tracing::info;

pub const DEFAULT_SEED_USERS: &str = "admin1:secret:admin,user1:secret:user";

/// One identity to create at startup
#[derive(Clone, PartialEq, Eq)]
pub struct UserSeed {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for UserSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSeed")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl UserSeed {
    pub fn parse_list(list: &str) -> Result<Vec<UserSeed>> {
        list.split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(UserSeed::parse)
            .collect()
    }

    fn parse(entry: &str) -> Result<UserSeed> {
        // Password may contain ':'; username is the first field, role the last
        let (username, rest) = entry
            .split_once(':')
            .ok_or_else(|| IdentityError::InvalidSeed(format!("expected user:password:role, got '{}'", entry)))?;
        let (password, role) = rest
            .rsplit_once(':')
            .ok_or_else(|| IdentityError::InvalidSeed(format!("missing role in '{}'", username)))?;

        let role = role
            .parse::<Role>()
            .map_err(|e| IdentityError::InvalidSeed(e.to_string()))?;

        Ok(UserSeed {
            username: username.trim().to_string(),
            password: password.to_string(),
            role,
        })
    }
}

/// Create every seeded identity in `store`
pub async fn seed_users(store: &dyn UserStore, seeds: &[UserSeed]) -> Result<()> {
    for seed in seeds {
        let user = User::new(seed.username.clone(), &seed.password, seed.role)?;
        store.save(user).await?;
    }

    info!(count = seeds.len(), "Seeded users");
    Ok(())
}
