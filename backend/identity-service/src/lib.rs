/// Identity Service Library
///
/// Provides credential storage and login for the catalog backend.
///
/// ## Modules
///
/// - `config`: Identity seeding from configuration
/// - `error`: Error types
/// - `grpc`: gRPC `AuthService` implementation
/// - `models`: User model
/// - `security`: Password hashing
/// - `store`: Credential store (`UserStore`)
pub mod config;
pub mod error;
pub mod grpc;
pub mod models;
pub mod security;
pub mod store;

// Re-export commonly used types
pub use error::{IdentityError, Result};
pub use grpc::{AuthServiceImpl, AuthServiceServer};
pub use store::{InMemoryUserStore, UserStore};
