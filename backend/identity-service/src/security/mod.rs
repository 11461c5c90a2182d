/// Security module for authentication
///
/// - **password**: Argon2id password hashing
///
/// Token issuance lives in the shared `grpc-jwt-auth` library so the
/// authorization gate and the login handler use the same `TokenManager`.
pub mod password;

pub use grpc_jwt_auth::TokenManager;
pub use password::{hash_password, verify_password};
