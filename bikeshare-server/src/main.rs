use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use bikeshare_server::cache::CachedPipeline;
use bikeshare_server::config::ServerConfig;
use bikeshare_server::gbfs::GbfsClient;
use bikeshare_server::pipeline::Pipeline;
use bikeshare_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bikeshare_server=info".parse().unwrap()),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    info!(
        directory = %config.directory_url,
        ttl_secs = config.cache.ttl.as_secs(),
        attempts = config.fetch.max_attempts,
        "bikeshare server starting"
    );

    let client = GbfsClient::new(config.fetch.clone()).expect("Failed to create GBFS client");
    let pipeline = Pipeline::new(client, config.directory_url.clone());
    let cached = CachedPipeline::new(pipeline, &config.cache);

    let shutdown = CancellationToken::new();
    let state = AppState::new(cached, shutdown.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    info!("listening on http://{}", config.bind_addr);
    info!("  GET /health            - Health check");
    info!("  GET /languages         - Selectable languages");
    info!("  GET /stations          - Station table (?lang=en)");
    info!("  GET /stations/markers  - Map markers (?lang=en)");
    info!("  GET /free-bikes        - Dockless vehicles (?lang=en)");

    let token = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("shutdown requested");
            token.cancel();
        })
        .await;

    if let Err(e) = served {
        error!("server error: {e}");
    }
}

/// Wait for SIGTERM or SIGINT (Ctrl-C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
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
}
