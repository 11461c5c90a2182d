//! Configuration management for the catalog service
//!
//! Loads settings from environment variables, with a `.env` file picked up
//! in debug builds.
//!
//! # Example
//!
//! ```no_run
//! use catalog_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("listening on {}:{}", settings.server.host, settings.server.port);
//!     Ok(())
//! }
//! ```

use crate::grpc::{default_access_policy, SERVICE_NAME};
use crate::handlers::upload::DEFAULT_MAX_IMAGE_SIZE;
use anyhow::{anyhow, Context, Result};
use grpc_jwt_auth::{AccessPolicy, DEFAULT_TOKEN_TTL};
use identity_service::config::{UserSeed, DEFAULT_SEED_USERS};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub jwt: JwtSettings,
    pub storage: StorageSettings,
    pub access_policy: AccessPolicy,
    pub seed_users: Vec<UserSeed>,
    /// Random laptops to create at startup, for demos
    pub sample_laptops: usize,
}

impl Settings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self> {
        // Load .env file in development
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, so tests need not touch the
    /// process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_policy = match lookup("ACCESS_POLICY") {
            Some(raw) => AccessPolicy::parse(&raw, SERVICE_NAME).context("Invalid ACCESS_POLICY")?,
            None => default_access_policy(),
        };

        let seed_users = UserSeed::parse_list(
            &lookup("SEED_USERS").unwrap_or_else(|| DEFAULT_SEED_USERS.to_string()),
        )
        .context("Invalid SEED_USERS")?;

        Ok(Settings {
            server: ServerSettings::from_lookup(&lookup)?,
            jwt: JwtSettings::from_lookup(&lookup)?,
            storage: StorageSettings::from_lookup(&lookup)?,
            access_policy,
            seed_users,
            sample_laptops: parse_or(&lookup, "SAMPLE_LAPTOPS", 0)?,
        })
    }
}

/// gRPC listener settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            host: lookup("CATALOG_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(lookup, "CATALOG_PORT", 8080)?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Access token settings
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub token_ttl: Duration,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl JwtSettings {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET must be set"))?;

        Ok(Self {
            secret,
            token_ttl: Duration::from_secs(parse_or(
                lookup,
                "JWT_TOKEN_TTL_SECS",
                DEFAULT_TOKEN_TTL.as_secs(),
            )?),
        })
    }
}

/// Image blob settings
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub image_folder: PathBuf,
    pub max_image_size: usize,
}

impl StorageSettings {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let max_image_size: u32 = parse_or(lookup, "MAX_IMAGE_SIZE", DEFAULT_MAX_IMAGE_SIZE as u32)?;

        Ok(Self {
            image_folder: PathBuf::from(lookup("IMAGE_FOLDER").unwrap_or_else(|| "img".to_string())),
            max_image_size: max_image_size as usize,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("Invalid {}", key)),
        None => Ok(default),
    }
}
