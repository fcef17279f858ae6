use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Store-assigned key of a boat. Never supplied by clients.
pub type BoatId = i64;

/// Number of client-writable attributes a complete boat carries.
pub const BOAT_ATTRIBUTE_COUNT: usize = 3;

/// The mutable attributes of a boat, exactly as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatData {
    pub name: String,
    #[serde(rename = "type")]
    pub boat_type: String,
    pub length: Number,
}

impl BoatData {
    pub fn new(name: impl Into<String>, boat_type: impl Into<String>, length: impl Into<Number>) -> Self {
        Self {
            name: name.into(),
            boat_type: boat_type.into(),
            length: length.into(),
        }
    }
}

/// A persisted boat together with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct Boat {
    pub id: BoatId,
    pub data: BoatData,
}

impl Boat {
    pub fn new(id: BoatId, data: BoatData) -> Self {
        Self { id, data }
    }
}

/// Attributes supplied by a mutation request.
///
/// Each field is `Some` exactly when its key was present in the request body,
/// so `length: 0` or `name: ""` still count as supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoatPayload {
    pub name: Option<String>,
    pub boat_type: Option<String>,
    pub length: Option<Number>,
}

impl BoatPayload {
    /// Converts a payload carrying every attribute into stored data.
    pub fn into_complete(self) -> Option<BoatData> {
        Some(BoatData {
            name: self.name?,
            boat_type: self.boat_type?,
            length: self.length?,
        })
    }
}

/// Wire shape of a boat, including its `self` link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatRepresentation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub boat_type: String,
    pub length: Number,
    #[serde(rename = "self")]
    pub self_link: String,
}

impl BoatRepresentation {
    pub fn new(boat: &Boat, base_url: &str) -> Self {
        Self {
            id: boat.id.to_string(),
            name: boat.data.name.clone(),
            boat_type: boat.data.boat_type.clone(),
            length: boat.data.length.clone(),
            self_link: boat_url(base_url, boat.id),
        }
    }
}

/// Absolute URL of a boat resource.
pub fn boat_url(base_url: &str, id: BoatId) -> String {
    format!("{}/boats/{}", base_url.trim_end_matches('/'), id)
}
