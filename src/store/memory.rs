use anyhow::anyhow;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::model::{Boat, BoatData, BoatId};
use crate::store::traits::{BoatStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryState {
    boats: BTreeMap<BoatId, BoatData>,
    /// Last key handed out; keys are never reused.
    last_id: BoatId,
    closed: bool,
}

impl MemoryState {
    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::Backend(anyhow!("memory store is closed")));
        }
        Ok(())
    }

    fn ensure_name_free(&self, name: &str, except: Option<BoatId>) -> StoreResult<()> {
        let taken = self
            .boats
            .iter()
            .any(|(id, data)| Some(*id) != except && data.name == name);
        if taken {
            return Err(StoreError::NameTaken(name.to_string()));
        }
        Ok(())
    }
}

/// In-process boat store. Keys are assigned from 1 upwards.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BoatStore for MemoryStore {
    async fn list_boats(&self) -> StoreResult<Vec<Boat>> {
        let state = self.state.read();
        state.ensure_open()?;
        Ok(state
            .boats
            .iter()
            .map(|(id, data)| Boat::new(*id, data.clone()))
            .collect())
    }

    async fn get_boat(&self, id: BoatId) -> StoreResult<Option<Boat>> {
        let state = self.state.read();
        state.ensure_open()?;
        Ok(state.boats.get(&id).map(|data| Boat::new(id, data.clone())))
    }

    async fn insert_boat(&self, data: BoatData) -> StoreResult<BoatId> {
        let mut state = self.state.write();
        state.ensure_open()?;
        state.ensure_name_free(&data.name, None)?;

        state.last_id += 1;
        let id = state.last_id;
        state.boats.insert(id, data);
        Ok(id)
    }

    async fn update_boat(&self, id: BoatId, data: BoatData) -> StoreResult<()> {
        let mut state = self.state.write();
        state.ensure_open()?;
        if !state.boats.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        state.ensure_name_free(&data.name, Some(id))?;

        state.boats.insert(id, data);
        Ok(())
    }

    async fn delete_boat(&self, id: BoatId) -> StoreResult<bool> {
        let mut state = self.state.write();
        state.ensure_open()?;
        Ok(state.boats.remove(&id).is_some())
    }

    async fn close(&self) {
        let mut state = self.state.write();
        state.closed = true;
        state.boats.clear();
        log::info!("memory store closed");
    }
}
