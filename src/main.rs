use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tracing::info;

use roomd::engine::Engine;
use roomd::{http, observability, seed};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("ROOMD_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    observability::init(metrics_port);

    let port = std::env::var("ROOMD_PORT").unwrap_or_else(|_| "8080".into());
    let bind = std::env::var("ROOMD_BIND").unwrap_or_else(|_| "0.0.0.0".into());
    let data_dir = std::env::var("ROOMD_DATA_DIR").unwrap_or_else(|_| "./data".into());
    let cors_origin = std::env::var("ROOMD_CORS_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:3000".into());

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)?;
    let wal_path = PathBuf::from(&data_dir).join("roomd.wal");

    let engine = Arc::new(Engine::open(wal_path)?);
    seed::seed_rooms(&engine).await?;

    let origin: HeaderValue = cors_origin.parse()?;
    let app = http::router(engine, origin);

    let addr = format!("{bind}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("roomd listening on {addr}");
    info!("  data_dir: {data_dir}");
    info!("  cors_origin: {cors_origin}");
    info!(
        "  metrics: {}",
        metrics_port.map_or("disabled".to_string(), |p| format!(
            "http://0.0.0.0:{p}/metrics"
        ))
    );

    // Graceful shutdown: stop accepting on SIGTERM/ctrl-c, axum drains
    // in-flight requests before returning.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("roomd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
    info!("shutdown signal received, stopping accept loop");
}
