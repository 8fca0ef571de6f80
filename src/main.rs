use minichat::{build_router, AppState, Hub, ServerConfig, SessionConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minichat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting chat server");

    let server_config = ServerConfig::from_env();
    let session_config = SessionConfig::from_env();

    // The hub task runs until the last handle is dropped
    let (hub, _hub_task) = Hub::spawn(session_config.hub_capacity);
    let app = build_router(AppState::new(hub, session_config));

    // Failing to bind is fatal
    let listener = tokio::net::TcpListener::bind(server_config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
