use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::logic::negotiate;
use crate::model::BoatPayload;

/// How an attribute count must relate to the expected count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    GreaterThan,
    LessThan,
}

impl Comparator {
    fn holds(self, actual: usize, expected: usize) -> bool {
        match self {
            Self::Equal => actual == expected,
            Self::GreaterThan => actual > expected,
            Self::LessThan => actual < expected,
        }
    }
}

pub fn verify_accept(accept: Option<&str>, media_type: &str) -> Result<(), ApiError> {
    if negotiate::accepts(accept, media_type) {
        Ok(())
    } else {
        Err(ApiError::NotAcceptable(format!("Server only sends {} data", media_type)))
    }
}

/// A missing `Content-Type` never matches.
pub fn verify_content_type(content_type: Option<&str>, media_type: &str) -> Result<(), ApiError> {
    match content_type {
        Some(value) if negotiate::essence(value) == media_type => Ok(()),
        _ => Err(ApiError::UnsupportedMediaType(format!(
            "Server only accepts {} data",
            media_type
        ))),
    }
}

pub fn check_attribute_count(
    body: &Map<String, Value>,
    comparator: Comparator,
    expected: usize,
) -> Result<(), ApiError> {
    if comparator.holds(body.len(), expected) {
        Ok(())
    } else {
        Err(ApiError::invalid_attribute_count())
    }
}

/// Rejects any payload naming `id`, whatever its value.
pub fn reject_identity_field(body: &Map<String, Value>) -> Result<(), ApiError> {
    if body.contains_key("id") {
        return Err(ApiError::bad_request("ID is not allowed to update"));
    }
    Ok(())
}

/// Parses a request body that must be a JSON object.
pub fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::bad_request("Request body must be a JSON object")),
        Err(e) => Err(ApiError::bad_request(format!("Malformed JSON body: {}", e))),
    }
}

/// Extracts boat attributes, recording which keys were present.
pub fn parse_payload(body: &Map<String, Value>) -> Result<BoatPayload, ApiError> {
    let mut payload = BoatPayload::default();

    for (key, value) in body {
        match key.as_str() {
            "name" => payload.name = Some(expect_string(key, value)?),
            "type" => payload.boat_type = Some(expect_string(key, value)?),
            "length" => match value {
                Value::Number(n) => payload.length = Some(n.clone()),
                _ => return Err(wrong_type(key, "a number")),
            },
            _ => return Err(ApiError::bad_request(format!("Unknown attribute '{}'", key))),
        }
    }

    Ok(payload)
}

fn expect_string(key: &str, value: &Value) -> Result<String, ApiError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(key, "a string"))
}

fn wrong_type(key: &str, expected: &str) -> ApiError {
    ApiError::bad_request(format!("Attribute '{}' must be {}", key, expected))
}
