use std::sync::Arc;

use server::config::ServerConfig;
use server::{build_router, AppContext};
use shared::Catalog;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,tower_http=info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load the product catalog: {e}");
            std::process::exit(1);
        }
    };

    let bind_addr = config.bind_addr;
    let app = build_router(Arc::new(AppContext::new(catalog, config)));

    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Server running on http://{bind_addr}");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
    }
}
