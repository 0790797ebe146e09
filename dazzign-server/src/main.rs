//! Dazzign API Server
//!
//! HTTP server for the Dazzign PC case design service.
//!
//! # Endpoints
//!
//! - GET /node/root - Paginated list of root nodes
//! - GET /node/{id} - Single node lookup
//! - GET /node/{id}/tree - Lineage tree rooted at a node
//! - POST /text-gen/to-spec - Extract design attributes from a prompt
//! - POST /images/generate - Generate an image and record it as a node
//! - GET /health, /ready, /metrics
//!
//! # Configuration
//!
//! Environment variables:
//! - DATABASE_URL - PostgreSQL connection string
//! - PORT - HTTP port (default: 8080)
//! - DAZZIGN_IMAGE_PROVIDER / DAZZIGN_SPEC_PROVIDER - provider selection
//! - DAZZIGN_SAMPLE_FALLBACK - serve sample data on read failures

use dazzign_server::config::{
    mask_password, ImageProviderKind, ServerConfig, SpecProviderKind,
};
use dazzign_server::handler::{router, AppState};
use dazzign_server::providers::{
    ImageBackend, KeywordSpecBackend, OpenAiSpecBackend, SampleImageBackend, SpecBackend,
    StabilityImageBackend,
};
use dazzign_storage::PostgresStorage;
use std::sync::Arc;
use tokio::signal;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dazzign_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Dazzign API Server");

    let config = match ServerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        database_url = %mask_password(&config.database_url),
        port = config.port,
        sample_fallback = config.sample_fallback,
        "Configuration loaded"
    );

    let storage = match PostgresStorage::new(&config.database_url).await {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!(error = %e, "Failed to initialize storage");
            std::process::exit(1);
        }
    };

    if let Err(e) = dazzign_storage::migrations::run_migrations(storage.pool()).await {
        error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    info!("Storage initialized successfully");

    let image_backend: Arc<dyn ImageBackend> = match config.image_provider {
        ImageProviderKind::Sample => Arc::new(SampleImageBackend::new()),
        ImageProviderKind::Stability => {
            let api_key = config.stability_api_key.clone().unwrap_or_default();
            match StabilityImageBackend::new(api_key, config.request_timeout) {
                Ok(backend) => Arc::new(backend),
                Err(e) => {
                    error!(error = %e, "Failed to build stability backend");
                    std::process::exit(1);
                }
            }
        }
    };

    let spec_backend: Arc<dyn SpecBackend> = match config.spec_provider {
        SpecProviderKind::Keyword => Arc::new(KeywordSpecBackend),
        SpecProviderKind::OpenAi => {
            let api_key = config.openai_api_key.clone().unwrap_or_default();
            match OpenAiSpecBackend::new(
                api_key,
                config.openai_model.clone(),
                config.request_timeout,
            ) {
                Ok(backend) => Arc::new(backend),
                Err(e) => {
                    error!(error = %e, "Failed to build openai backend");
                    std::process::exit(1);
                }
            }
        }
    };

    info!(
        image_provider = image_backend.name(),
        spec_provider = spec_backend.name(),
        "Providers initialized"
    );

    let state = AppState {
        storage,
        image_backend,
        spec_backend,
        sample_fallback: config.sample_fallback,
    };

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024)); // 2MB max request body

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, address = %addr, "Failed to bind server");
            std::process::exit(1);
        }
    };

    info!(address = %addr, "Server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }

    info!("Server shut down gracefully");
}

/// Graceful shutdown signal handler
///
/// Waits for SIGTERM or Ctrl-C
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl-C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
