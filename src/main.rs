mod core;
mod features;
mod shared;

use crate::core::app::build_app;
use crate::core::config::Config;
use crate::features::locator::{
    routes as locator_routes, LocatorService, MapService, MetadataService, NominatimGeocoder,
    UploadService,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    config.storage.ensure_dirs().map_err(|e| {
        anyhow::anyhow!(
            "Failed to create storage directories {} / {}: {}",
            config.storage.upload_dir.display(),
            config.storage.map_dir.display(),
            e
        )
    })?;
    tracing::info!(
        "Storage ready: uploads={}, maps={}",
        config.storage.upload_dir.display(),
        config.storage.map_dir.display()
    );

    let geocoder = Arc::new(
        NominatimGeocoder::new(&config.geocoder)
            .map_err(|e| anyhow::anyhow!("Failed to initialize geocoder: {}", e))?,
    );
    tracing::info!(
        "Geocoder initialized: {} (language={}, timeout={:?})",
        config.geocoder.base_url,
        config.geocoder.language,
        config.geocoder.timeout
    );

    let locator_service = Arc::new(LocatorService::new(
        UploadService::new(config.storage.upload_dir.clone()),
        MetadataService::new(),
        geocoder,
        MapService::new(config.storage.map_dir.clone(), config.map.clone()),
    ));
    tracing::info!("Locator service initialized");

    let app = build_app(locator_routes(
        locator_service,
        config.app.max_request_body_size,
    ));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
