use anyhow::Result;
use mock_airthings::{MockState, build_router, view_plus_sample, wave_enhance_sample};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn read_env(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    eprintln!("[mock-airthings] booting...");
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Same variable names as the proxy so one .env drives both.
    let state = MockState::new(
        read_env("AIRTHINGS_CLIENT_ID", "dev-client"),
        read_env("AIRTHINGS_CLIENT_SECRET", "dev-secret"),
    )
    .with_device(read_env("AIRTHINGS_DEVICE_ID", "2960000001"), view_plus_sample())
    .with_device(
        read_env("AIRTHINGS_BEDROOM_DEVICE_ID", "3210000001"),
        wave_enhance_sample(),
    );
    let app = build_router(Arc::new(state));

    let host = read_env("MOCK_AIRTHINGS_HOST", "0.0.0.0");
    let port: u16 = read_env("MOCK_AIRTHINGS_PORT", "8089")
        .parse()
        .unwrap_or(8089);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("mock-airthings listening on http://{addr}");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("mock-airthings shutdown complete");
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
