use airthings_proxy::airthings::AirthingsClient;
use airthings_proxy::config::{Endpoints, read_env, read_env_optional};
use airthings_proxy::{AppState, build_router};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    eprintln!("[airthings-proxy] booting...");
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let endpoints = Endpoints::from_env();
    let http_client = reqwest::Client::builder()
        .build()
        .context("build outbound http client")?;
    let airthings = AirthingsClient::new(http_client, endpoints);
    tracing::info!(
        token_url = %airthings.endpoints().token_url,
        api_base = %airthings.endpoints().api_base,
        "airthings endpoints"
    );
    let app = build_router(Arc::new(AppState::new(airthings)));

    // Prefer the service-specific port, then PORT as most hosting platforms set it.
    let host = read_env("AIRTHINGS_PROXY_HOST", "0.0.0.0");
    let port: u16 = read_env_optional("AIRTHINGS_PROXY_PORT")
        .or_else(|| read_env_optional("PORT"))
        .and_then(|s| s.parse().ok())
        .unwrap_or(8888);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid bind address {host}:{port}"))?;
    tracing::info!("airthings-proxy listening on http://{addr}");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("airthings-proxy shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigint = signal(SignalKind::interrupt()).expect("listen SIGINT");
    let mut sigterm = signal(SignalKind::terminate()).expect("listen SIGTERM");
    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
