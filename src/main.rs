use boat_registry::config::{AppConfig, StoreBackend};
use boat_registry::{BoatStore, MemoryStore, PostgresStore};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default, sqlx debug logs suppressed; RUST_LOG overrides
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,sqlx=warn"))
        .init();

    let config = AppConfig::load()?;
    log::info!(
        "configuration loaded: server={}:{} store={:?}",
        config.server.host,
        config.server.port,
        config.store.backend
    );

    match config.store.backend {
        StoreBackend::Memory => run_server(Arc::new(MemoryStore::new()), &config).await,
        StoreBackend::Postgres => {
            log::info!("connecting to PostgreSQL...");
            let store = PostgresStore::connect(&config.database_url()?, config.max_connections()).await?;
            store.migrate().await?;
            log::info!("boats table ready");
            run_server(Arc::new(store), &config).await
        }
    }
}

async fn run_server<S: BoatStore + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.server_address()).await?;
    boat_registry::serve(listener, store, config.base_url(), shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}
