use std::collections::HashMap;

use tokio::sync::RwLock;

use jimbo_core::domain::event::{Event, EventId};

use super::{EventRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<String, Event>>,
}

impl InMemoryEventRepository {
    pub async fn find_by_id(&self, id: &EventId) -> Option<Event> {
        self.events.read().await.get(id.as_str()).cloned()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: Event) -> Result<(), RepositoryError> {
        let mut events = self.events.write().await;
        if events.contains_key(event.id.as_str()) {
            return Err(RepositoryError::DuplicateKey(event.id.0));
        }
        events.insert(event.id.0.clone(), event);
        Ok(())
    }

    async fn get_going(&self, id: &EventId) -> Result<Vec<String>, RepositoryError> {
        let events = self.events.read().await;
        events
            .get(id.as_str())
            .map(|event| event.going.clone())
            .ok_or_else(|| RepositoryError::NotFound(id.0.clone()))
    }

    async fn get_flaking(&self, id: &EventId) -> Result<Vec<String>, RepositoryError> {
        let events = self.events.read().await;
        events
            .get(id.as_str())
            .map(|event| event.flaking.clone())
            .ok_or_else(|| RepositoryError::NotFound(id.0.clone()))
    }

    async fn set_going(&self, id: &EventId, going: &[String]) -> Result<(), RepositoryError> {
        let mut events = self.events.write().await;
        let event =
            events.get_mut(id.as_str()).ok_or_else(|| RepositoryError::NotFound(id.0.clone()))?;
        event.going = going.to_vec();
        Ok(())
    }

    async fn set_flaking(&self, id: &EventId, flaking: &[String]) -> Result<(), RepositoryError> {
        let mut events = self.events.write().await;
        let event =
            events.get_mut(id.as_str()).ok_or_else(|| RepositoryError::NotFound(id.0.clone()))?;
        event.flaking = flaking.to_vec();
        Ok(())
    }

    async fn set_attendance(
        &self,
        id: &EventId,
        going: &[String],
        flaking: &[String],
    ) -> Result<(), RepositoryError> {
        let mut events = self.events.write().await;
        let event =
            events.get_mut(id.as_str()).ok_or_else(|| RepositoryError::NotFound(id.0.clone()))?;
        event.going = going.to_vec();
        event.flaking = flaking.to_vec();
        Ok(())
    }
}
