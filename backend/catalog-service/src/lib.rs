//! Catalog Service
//!
//! gRPC service for laptop records: create, filtered streaming search,
//! chunked image upload and a bidirectional rating stream. Login and token
//! checks come from `identity-service` and `grpc-jwt-auth`.

pub mod config;
pub mod context;
pub mod error;
pub mod grpc;
pub mod handlers;
pub mod pb;
pub mod sample;
pub mod serializer;
pub mod server;
pub mod store;

// Public re-exports
pub use config::Settings;
pub use context::{CallContext, ContextError};
pub use error::{CatalogError, Result};
pub use grpc::{LaptopServiceClient, LaptopServiceImpl, LaptopServiceServer};
pub use server::{serve, AppState};
