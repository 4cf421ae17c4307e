//! In-memory scene provider for tests and host-less consumers

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{ProviderError, SceneEntity, SceneEvent, SceneStateProvider};
use crate::types::EntityId;

/// Simulates the host scene store in memory.
///
/// Entities live behind a mutex; `reject_next_update` arms a one-shot
/// whole-call rejection for exercising the non-atomic failure path.
#[derive(Clone)]
pub struct MockSceneProvider {
    entities: Arc<Mutex<BTreeMap<EntityId, SceneEntity>>>,
    events: broadcast::Sender<SceneEvent>,
    reject_next_update: Arc<Mutex<Option<String>>>,
}

impl MockSceneProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        MockSceneProvider {
            entities: Arc::new(Mutex::new(BTreeMap::new())),
            events,
            reject_next_update: Arc::new(Mutex::new(None)),
        }
    }

    pub fn insert(&self, entity: SceneEntity) {
        self.entities.lock().unwrap().insert(entity.id.clone(), entity);
    }

    pub fn remove(&self, id: &EntityId) {
        self.entities.lock().unwrap().remove(id);
    }

    /// Current state of one entity, for assertions
    pub fn entity(&self, id: &EntityId) -> Option<SceneEntity> {
        self.entities.lock().unwrap().get(id).cloned()
    }

    /// Make the next `update_entities` call fail as a whole
    pub fn reject_next_update(&self, reason: &str) {
        *self.reject_next_update.lock().unwrap() = Some(reason.to_string());
    }

    /// Simulate the host reporting a selection change
    pub fn emit_selection(&self, ids: Vec<EntityId>) {
        let _ = self.events.send(SceneEvent::SelectionChanged(ids));
    }
}

impl Default for MockSceneProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SceneStateProvider for MockSceneProvider {
    async fn get_entities(&self, ids: &[EntityId]) -> Result<Vec<SceneEntity>, ProviderError> {
        let entities = self.entities.lock().unwrap();
        Ok(ids.iter().filter_map(|id| entities.get(id).cloned()).collect())
    }

    async fn get_all_entities(&self) -> Result<Vec<SceneEntity>, ProviderError> {
        let entities = self.entities.lock().unwrap();
        Ok(entities.values().cloned().collect())
    }

    async fn update_entities(
        &self,
        ids: &[EntityId],
        mutate: &(dyn for<'a> Fn(&'a mut SceneEntity) + Send + Sync),
    ) -> Result<(), ProviderError> {
        if let Some(reason) = self.reject_next_update.lock().unwrap().take() {
            return Err(ProviderError::WriteRejected(reason));
        }

        {
            let mut entities = self.entities.lock().unwrap();
            for id in ids {
                if let Some(entity) = entities.get_mut(id) {
                    mutate(entity);
                }
            }
        }

        let _ = self.events.send(SceneEvent::EntitiesChanged(ids.to_vec()));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SceneEvent> {
        self.events.subscribe()
    }
}
