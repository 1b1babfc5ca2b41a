use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use video_metadata_api::{
    config::Config,
    db::{self, PgVideoStore},
    models::AppState,
    routes, system_info,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("video_metadata_api=debug,tower_http=debug")),
        )
        .init();

    // Load configuration; any missing variable stops startup here
    let config = Config::load()?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    system_info::print_startup_info(&config);

    let pool = db::connect(&config.database).await?;
    let store = PgVideoStore::new(pool.clone());

    let app_state = Arc::new(AppState {
        store: Arc::new(store),
        config: config.clone(),
    });

    let app = routes::app(app_state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("✅ Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("👋 Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received, draining connections");
}
