//! FoodHub API server.

use anyhow::{Context, Result};
use clap::Parser;
use foodhub_api_rest::{create_app, AppState, Args, Backends};
use foodhub_application::Argon2PasswordHasher;
use foodhub_common::telemetry::init_from_config;
use foodhub_infrastructure::{
    image_store_from_config, mongo_repositories, Database, LocalDiskStorage,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.load().context("Failed to load configuration")?;

    init_from_config(&config.telemetry)?;

    info!(
        address = %config.server_address(),
        database = %config.database.name,
        swagger = config.server.enable_swagger,
        "Starting FoodHub API"
    );

    let db = Database::connect(&config.database).await?;
    if let Err(e) = db.ensure_indexes().await {
        // The server can still answer; /ready reports the database state
        warn!(error = %e, "Could not create indexes");
    }

    let backends = Backends {
        repositories: mongo_repositories(&db),
        cover_images: Arc::new(LocalDiskStorage::new(&config.storage.images_dir).await?),
        uploads: image_store_from_config(&config.storage).await?,
        hasher: Arc::new(Argon2PasswordHasher),
        health: Arc::new(db),
    };

    if config.auth.admin_api_key.is_none() {
        warn!("No admin key configured, admin routes are disabled");
    }

    let address = config.server_address();
    let app = create_app(AppState::new(config, backends));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "Server ready");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
