pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;

use std::sync::Arc;

pub use api::{BoatService, RequestMeta};
pub use error::{ApiError, ErrorResponse};
pub use model::*;
pub use store::{BoatStore, MemoryStore, PostgresStore, StoreError};

/// Builds the boat API over an already opened store.
pub fn app<S: BoatStore + 'static>(store: Arc<S>, base_url: impl Into<String>) -> axum::Router {
    let service = Arc::new(BoatService::new(store, base_url));
    api::routes::create_router::<S>().with_state(service)
}

/// Serves the API until `shutdown` resolves, then closes the store.
pub async fn serve<S, F>(
    listener: tokio::net::TcpListener,
    store: Arc<S>,
    base_url: String,
    shutdown: F,
) -> anyhow::Result<()>
where
    S: BoatStore + 'static,
    F: std::future::Future<Output = ()> + Send + 'static,
{
    log::info!("boat registry listening on http://{}", listener.local_addr()?);
    log::info!("self links use base url {}", base_url);

    let result = axum::serve(listener, app(store.clone(), base_url))
        .with_graceful_shutdown(shutdown)
        .await;

    store.close().await;
    result?;
    Ok(())
}
