use anyhow::Result;
use shared::Config;
use sms_inbox_ws::{create_app_router, observability::init_tracing, state::AppState};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Carga .env (si existe) y luego las variables de entorno
    let config = Config::from_env()?;

    init_tracing(&config.app)?;
    info!(config = ?config, "🔧 Configuration loaded");

    // Abre la base de datos y crea el esquema si hace falta
    let app_state = Arc::new(AppState::new(config).await?);
    info!("🚀 Application state initialized");

    let app = create_app_router(app_state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], app_state.config.app.port));
    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app_state.store.close().await;
    info!("👋 Database pool closed, bye");
    Ok(())
}
