use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::handlers::{self, AppState};
use crate::store::BoatStore;

pub fn create_router<S: BoatStore + 'static>() -> Router<AppState<S>> {
    let collection = post(handlers::create_boat::<S>).fallback(handlers::collection_not_allowed);

    Router::new()
        .route("/", get(handlers::hello).fallback(handlers::read_only_not_allowed))
        // Health check
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::read_only_not_allowed),
        )
        // Boat collection; every other method answers 405
        .route("/boats", collection.clone())
        .route("/boats/", collection)
        // Single boat
        .route(
            "/boats/:boat_id",
            get(handlers::get_boat::<S>)
                .patch(handlers::patch_boat::<S>)
                .put(handlers::put_boat::<S>)
                .delete(handlers::delete_boat::<S>)
                .fallback(handlers::boat_not_allowed),
        )
        .fallback(handlers::route_not_found)
        .layer(ServiceBuilder::new().layer(CatchPanicLayer::custom(handlers::panic_response)))
}
