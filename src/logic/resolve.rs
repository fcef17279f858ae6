use crate::error::ApiError;
use crate::model::{BoatData, BoatPayload};

/// How an update combines the request with the stored boat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// PATCH: supplied attributes overwrite, the rest are kept.
    Merge,
    /// PUT: the request replaces every attribute.
    Replace,
}

pub fn resolve(mode: UpdateMode, previous: BoatData, payload: BoatPayload) -> Result<BoatData, ApiError> {
    match mode {
        UpdateMode::Merge => Ok(merge(previous, payload)),
        UpdateMode::Replace => replace(payload),
    }
}

pub fn merge(previous: BoatData, payload: BoatPayload) -> BoatData {
    BoatData {
        name: payload.name.unwrap_or(previous.name),
        boat_type: payload.boat_type.unwrap_or(previous.boat_type),
        length: payload.length.unwrap_or(previous.length),
    }
}

pub fn replace(payload: BoatPayload) -> Result<BoatData, ApiError> {
    payload
        .into_complete()
        .ok_or_else(ApiError::invalid_attribute_count)
}
