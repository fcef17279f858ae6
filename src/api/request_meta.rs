use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::convert::Infallible;

/// Negotiation headers of a request, read before the body is touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestMeta {
    pub accept: Option<String>,
    pub content_type: Option<String>,
}

impl RequestMeta {
    pub fn new(accept: Option<&str>, content_type: Option<&str>) -> Self {
        Self {
            accept: accept.map(str::to_string),
            content_type: content_type.map(str::to_string),
        }
    }

    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            accept: joined_header_value(&parts.headers, header::ACCEPT),
            content_type: extract_header_value(&parts.headers, header::CONTENT_TYPE),
        })
    }
}

fn extract_header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}

/// `Accept` may be split over several header lines.
fn joined_header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}
