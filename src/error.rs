use axum::{
    extract::rejection::BytesRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

pub const BOAT_NOT_FOUND: &str = "No boat with this boat_id exists";
pub const INVALID_ATTRIBUTE_COUNT: &str = "The number of attributes is invalid";

/// Every way a boat request can fail, each carrying its client-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    UnsupportedMediaType(String),
    #[error("{0}")]
    NotAcceptable(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    MethodNotAllowed { message: String, allow: &'static str },
    /// A failure raised by axum itself before a handler ran, e.g. an oversized body.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn invalid_attribute_count() -> Self {
        Self::BadRequest(INVALID_ATTRIBUTE_COUNT.to_string())
    }

    pub fn boat_not_found() -> Self {
        Self::NotFound(BOAT_NOT_FOUND.to_string())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Rejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::boat_not_found(),
            StoreError::NameTaken(_) => Self::Forbidden(crate::logic::NAME_TAKEN.to_string()),
            StoreError::Backend(e) => {
                log::error!("store failure: {:#}", e);
                Self::internal("An internal error occurred")
            }
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Error envelope sent for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}: {}", status, self);
        } else {
            log::debug!("{}: {}", status, self);
        }

        let mut response = (status, Json(ErrorResponse::new(&self.to_string()))).into_response();
        if let Self::MethodNotAllowed { allow, .. } = self {
            let value = HeaderValue::from_static(allow);
            response.headers_mut().insert(header::ALLOW, value.clone());
            response.headers_mut().insert(header::ACCEPT, value);
        }
        response
    }
}
