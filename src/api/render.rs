use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::error::ApiError;
use crate::logic::negotiate::{self, APPLICATION_JSON, TEXT_HTML};
use crate::model::BoatRepresentation;

/// Serializer chosen once per request from the negotiated media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Json,
    Html,
}

impl MediaKind {
    /// Offered in server preference order.
    pub const OFFERED: [&'static str; 2] = [APPLICATION_JSON, TEXT_HTML];

    pub fn negotiate(accept: Option<&str>) -> Result<Self, ApiError> {
        match negotiate::negotiate(accept, &Self::OFFERED) {
            Some(TEXT_HTML) => Ok(Self::Html),
            Some(_) => Ok(Self::Json),
            None => Err(ApiError::NotAcceptable(
                "Server only sends application/json or text/html".to_string(),
            )),
        }
    }
}

#[derive(Template)]
#[template(path = "boat.html")]
struct BoatPage<'a> {
    boat: &'a BoatRepresentation,
}

pub fn render(kind: MediaKind, status: StatusCode, boat: &BoatRepresentation) -> Result<Response, ApiError> {
    match kind {
        MediaKind::Json => Ok((status, Json(boat)).into_response()),
        MediaKind::Html => {
            let page = BoatPage { boat }
                .render()
                .map_err(|e| ApiError::internal(format!("Failed to render boat page: {}", e)))?;
            Ok((status, Html(page)).into_response())
        }
    }
}
