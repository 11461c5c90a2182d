/// Catalog Service Main Entry Point
///
/// Starts the gRPC server with:
/// - In-memory laptop, rating and user stores
/// - Disk-backed image store
/// - Bearer-token authorization gate
/// - Health service
use anyhow::{Context, Result};
use catalog_service::config::Settings;
use catalog_service::server::{serve, AppState};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "catalog_service=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting Catalog Service");

    let settings = Settings::load().context("Failed to load configuration")?;
    info!(
        image_folder = %settings.storage.image_folder.display(),
        max_image_size = settings.storage.max_image_size,
        restricted_methods = settings.access_policy.len(),
        "Configuration loaded successfully"
    );

    let state = AppState::from_settings(&settings).await?;

    let addr = settings.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    if let Err(err) = serve(state, listener, shutdown_signal()).await {
        error!("Server terminated: {:#}", err);
        return Err(err);
    }

    info!("Catalog service shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
