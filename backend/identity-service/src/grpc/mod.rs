/// gRPC server module for identity-service
///
/// Exports:
/// - AuthServiceImpl: Login handler
/// - pb: Wire messages and generated AuthService server/client
pub mod pb;
pub mod server;

pub use pb::auth_service_client::AuthServiceClient;
pub use pb::auth_service_server::{AuthService, AuthServiceServer};
pub use server::AuthServiceImpl;
