//! JWT Authentication and Role Authorization for gRPC Services
//!
//! This library issues and validates bearer tokens and enforces a per-method
//! role allow-list in front of tonic services.
//!
//! ## Core Components
//!
//! - **TokenManager**: Signs and validates HS256 tokens carrying username + role
//! - **AccessPolicy**: Static mapping from gRPC method path to allowed roles
//! - **AuthorizationLayer**: Tower layer that rejects calls before dispatch
//! - **BearerInterceptor**: Client interceptor that attaches the token to every call
//! - **ClaimsExt**: Request extension trait for reading the caller's claims in handlers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grpc_jwt_auth::{AccessPolicy, AuthorizationLayer, Role, TokenManager};
//! use std::time::Duration;
//!
//! let tokens = TokenManager::new(b"secret", Duration::from_secs(15 * 60));
//! let policy = AccessPolicy::new()
//!     .allow("/techschool.pcbook.LaptopService/CreateLaptop", [Role::Admin]);
//!
//! let layer = AuthorizationLayer::new(tokens, policy);
//! // tonic::transport::Server::builder().layer(layer).add_service(...)
//! ```
//!
//! ## Security Guarantees
//!
//! - Methods listed in the policy require `authorization: Bearer <token>`
//! - No token or invalid/expired token = `Status::unauthenticated`
//! - Role outside the method's allow-list = `Status::permission_denied`
//! - Methods absent from the policy pass through untouched

mod claims;
mod client;
mod error;
mod extensions;
mod gate;
mod policy;
mod token;

pub use claims::{Claims, Role};
pub use client::BearerInterceptor;
pub use error::AuthError;
pub use extensions::ClaimsExt;
pub use gate::{AuthorizationLayer, AuthorizationService};
pub use policy::AccessPolicy;
pub use token::{TokenManager, DEFAULT_TOKEN_TTL};

// Re-export tonic Status for convenience
pub use tonic::Status;
