//! Server assembly
//!
//! Builds the stores from `Settings` and serves the laptop, auth and health
//! services behind the authorization gate.
use crate::config::Settings;
use crate::grpc::{LaptopServiceImpl, LaptopServiceServer};
use crate::sample;
use crate::store::{DiskImageStore, InMemoryLaptopStore, InMemoryRatingStore, LaptopStore};
use anyhow::{Context, Result};
use grpc_jwt_auth::{AccessPolicy, AuthorizationLayer, TokenManager};
use identity_service::config::seed_users;
use identity_service::{AuthServiceImpl, AuthServiceServer, InMemoryUserStore};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

/// Everything one server instance owns
#[derive(Clone)]
pub struct AppState {
    pub laptops: Arc<InMemoryLaptopStore>,
    pub images: Arc<DiskImageStore>,
    pub ratings: Arc<InMemoryRatingStore>,
    pub users: Arc<InMemoryUserStore>,
    pub tokens: TokenManager,
    pub policy: AccessPolicy,
    pub max_image_size: usize,
}

impl AppState {
    /// Build empty stores, then seed identities and optional sample laptops
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let state = AppState {
            laptops: Arc::new(InMemoryLaptopStore::new()),
            images: Arc::new(DiskImageStore::new(&settings.storage.image_folder)),
            ratings: Arc::new(InMemoryRatingStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            tokens: TokenManager::new(settings.jwt.secret.as_bytes(), settings.jwt.token_ttl),
            policy: settings.access_policy.clone(),
            max_image_size: settings.storage.max_image_size,
        };

        seed_users(state.users.as_ref(), &settings.seed_users)
            .await
            .context("Failed to seed users")?;

        for _ in 0..settings.sample_laptops {
            state
                .laptops
                .save(sample::new_laptop())
                .context("Failed to seed sample laptops")?;
        }
        if settings.sample_laptops > 0 {
            info!(count = settings.sample_laptops, "Seeded sample laptops");
        }

        Ok(state)
    }
}

/// Serve on `listener` until `shutdown` resolves
pub async fn serve<F>(state: AppState, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let laptop_service = LaptopServiceImpl::new(
        state.laptops.clone(),
        state.images.clone(),
        state.ratings.clone(),
        state.max_image_size,
    );
    let auth_service = AuthServiceImpl::new(state.users.clone(), state.tokens.clone());

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<LaptopServiceServer<LaptopServiceImpl>>()
        .await;

    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Starting gRPC server on {}", addr);

    Server::builder()
        .layer(AuthorizationLayer::new(state.tokens, state.policy))
        .add_service(health_service)
        .add_service(LaptopServiceServer::new(laptop_service))
        .add_service(AuthServiceServer::new(auth_service))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
        .context("gRPC server error")?;

    info!("gRPC server stopped");
    Ok(())
}
