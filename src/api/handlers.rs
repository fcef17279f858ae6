use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;

use crate::api::render::{self, MediaKind};
use crate::api::request_meta::RequestMeta;
use crate::api::service::BoatService;
use crate::error::ApiError;
use crate::logic::UpdateMode;
use crate::store::BoatStore;

pub type AppState<S> = Arc<BoatService<S>>;

/// Methods the collection root supports, advertised on 405.
pub const COLLECTION_METHODS: &str = "POST";
/// Methods a single boat supports.
pub const BOAT_METHODS: &str = "GET, PATCH, PUT, DELETE";
pub const READ_ONLY_METHODS: &str = "GET";

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn hello() -> &'static str {
    "hello world"
}

pub async fn create_boat<S: BoatStore>(
    State(service): State<AppState<S>>,
    meta: RequestMeta,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = body?;
    let boat = service.create(&meta, &body).await?;
    render::render(MediaKind::Json, StatusCode::CREATED, &boat)
}

pub async fn get_boat<S: BoatStore>(
    State(service): State<AppState<S>>,
    Path(boat_id): Path<String>,
    meta: RequestMeta,
) -> Result<Response, ApiError> {
    let (kind, boat) = service.read(&meta, &boat_id).await?;
    render::render(kind, StatusCode::OK, &boat)
}

pub async fn patch_boat<S: BoatStore>(
    State(service): State<AppState<S>>,
    Path(boat_id): Path<String>,
    meta: RequestMeta,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = body?;
    let boat = service.update(&meta, &boat_id, &body, UpdateMode::Merge).await?;
    render::render(MediaKind::Json, StatusCode::OK, &boat)
}

/// Full replace answers 303 pointing at the boat's own URL.
pub async fn put_boat<S: BoatStore>(
    State(service): State<AppState<S>>,
    Path(boat_id): Path<String>,
    meta: RequestMeta,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = body?;
    let boat = service.update(&meta, &boat_id, &body, UpdateMode::Replace).await?;
    let location = HeaderValue::from_str(&boat.self_link)
        .map_err(|e| ApiError::internal(format!("Invalid Location header: {}", e)))?;

    let mut response = render::render(MediaKind::Json, StatusCode::SEE_OTHER, &boat)?;
    response.headers_mut().insert(header::LOCATION, location);
    Ok(response)
}

pub async fn delete_boat<S: BoatStore>(
    State(service): State<AppState<S>>,
    Path(boat_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete(&boat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Anything but POST on `/boats`.
pub async fn collection_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        message: format!("{} method is not allowed for root boat url", method),
        allow: COLLECTION_METHODS,
    }
}

pub async fn boat_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        message: format!("{} method is not allowed for boat url", method),
        allow: BOAT_METHODS,
    }
}

pub async fn read_only_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        message: format!("{} method is not allowed for this url", method),
        allow: READ_ONLY_METHODS,
    }
}

/// Paths outside the router still answer with the error envelope.
pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("No resource exists at this url".to_string())
}

/// Turns a handler panic into the usual 500 envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    log::error!("handler panicked: {}", detail);

    ApiError::internal("An internal error occurred").into_response()
}
