//! Per-verb sequencing of boat requests.
//!
//! Every mutation is validated in full before the store is touched, then the
//! name is checked against a fresh scan. The store enforces the same rule on
//! write, which covers two requests racing for one name between scan and write.

use std::sync::Arc;

use crate::api::render::MediaKind;
use crate::api::request_meta::RequestMeta;
use crate::error::ApiError;
use crate::logic::negotiate::APPLICATION_JSON;
use crate::logic::{
    check_attribute_count, ensure_unique_name, parse_body, parse_payload, reject_identity_field,
    resolve, verify_accept, verify_content_type, Comparator, UpdateMode,
};
use crate::model::{Boat, BoatId, BoatPayload, BoatRepresentation, BOAT_ATTRIBUTE_COUNT};
use crate::store::{BoatStore, StoreError};

pub struct BoatService<S> {
    store: Arc<S>,
    base_url: String,
}

impl<S: BoatStore> BoatService<S> {
    pub fn new(store: Arc<S>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { store, base_url }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn create(&self, meta: &RequestMeta, body: &[u8]) -> Result<BoatRepresentation, ApiError> {
        verify_content_type(meta.content_type(), APPLICATION_JSON)?;
        verify_accept(meta.accept(), APPLICATION_JSON)?;
        let body = parse_body(body)?;
        check_attribute_count(&body, Comparator::Equal, BOAT_ATTRIBUTE_COUNT)?;
        let data = parse_payload(&body)?
            .into_complete()
            .ok_or_else(ApiError::invalid_attribute_count)?;

        let boats = self.store.list_boats().await?;
        ensure_unique_name(&boats, &data.name, None)?;

        let id = self.store.insert_boat(data).await?;
        log::info!("created boat {}", id);
        self.fetch(id).await
    }

    pub async fn read(&self, meta: &RequestMeta, raw_id: &str) -> Result<(MediaKind, BoatRepresentation), ApiError> {
        let kind = MediaKind::negotiate(meta.accept())?;
        let id = parse_id(raw_id)?;
        let boat = self.fetch(id).await?;
        Ok((kind, boat))
    }

    /// PATCH (`Merge`) or PUT (`Replace`). Resolves to the stored result or a typed failure.
    pub async fn update(
        &self,
        meta: &RequestMeta,
        raw_id: &str,
        body: &[u8],
        mode: UpdateMode,
    ) -> Result<BoatRepresentation, ApiError> {
        verify_content_type(meta.content_type(), APPLICATION_JSON)?;
        verify_accept(meta.accept(), APPLICATION_JSON)?;
        let body = parse_body(body)?;
        reject_identity_field(&body)?;
        match mode {
            UpdateMode::Merge => {
                check_attribute_count(&body, Comparator::LessThan, BOAT_ATTRIBUTE_COUNT + 1)?
            }
            UpdateMode::Replace => {
                check_attribute_count(&body, Comparator::Equal, BOAT_ATTRIBUTE_COUNT)?
            }
        }
        let payload: BoatPayload = parse_payload(&body)?;
        let id = parse_id(raw_id)?;

        let boats = self.store.list_boats().await?;
        if let Some(name) = payload.name.as_deref() {
            ensure_unique_name(&boats, name, Some(id))?;
        }

        let previous = self
            .store
            .get_boat(id)
            .await?
            .ok_or_else(ApiError::boat_not_found)?;
        let data = resolve(mode, previous.data, payload)?;

        match self.store.update_boat(id, data).await {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => return Err(ApiError::boat_not_found()),
            Err(e) => return Err(e.into()),
        }
        log::info!("updated boat {} ({:?})", id, mode);
        self.fetch(id).await
    }

    pub async fn delete(&self, raw_id: &str) -> Result<(), ApiError> {
        let id = parse_id(raw_id)?;
        if self.store.get_boat(id).await?.is_none() {
            return Err(ApiError::boat_not_found());
        }

        if !self.store.delete_boat(id).await? {
            return Err(ApiError::boat_not_found());
        }
        log::info!("deleted boat {}", id);
        Ok(())
    }

    async fn fetch(&self, id: BoatId) -> Result<BoatRepresentation, ApiError> {
        let boat: Boat = self
            .store
            .get_boat(id)
            .await?
            .ok_or_else(ApiError::boat_not_found)?;
        Ok(BoatRepresentation::new(&boat, &self.base_url))
    }
}

/// Keys are numeric; anything else names no boat.
fn parse_id(raw: &str) -> Result<BoatId, ApiError> {
    raw.trim().parse::<BoatId>().map_err(|_| ApiError::boat_not_found())
}
