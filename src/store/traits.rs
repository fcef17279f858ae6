use thiserror::Error;

use crate::model::{Boat, BoatData, BoatId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("boat {0} does not exist")]
    NotFound(BoatId),
    #[error("boat name '{0}' is already taken")]
    NameTaken(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store holding boats.
///
/// Each call is atomic for a single boat only. Writes enforce name uniqueness
/// against every *other* boat and fail with [`StoreError::NameTaken`].
#[async_trait::async_trait]
pub trait BoatStore: Send + Sync {
    /// Full scan of every live boat, ordered by key.
    async fn list_boats(&self) -> StoreResult<Vec<Boat>>;
    async fn get_boat(&self, id: BoatId) -> StoreResult<Option<Boat>>;
    /// Persists a new boat and returns the key the store assigned.
    async fn insert_boat(&self, data: BoatData) -> StoreResult<BoatId>;
    /// Overwrites the attributes of an existing boat; [`StoreError::NotFound`] if it is gone.
    async fn update_boat(&self, id: BoatId, data: BoatData) -> StoreResult<()>;
    /// Returns whether a boat was removed.
    async fn delete_boat(&self, id: BoatId) -> StoreResult<bool>;
    /// Releases backend resources. Calls made afterwards fail.
    async fn close(&self);
}
