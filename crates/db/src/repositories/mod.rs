use async_trait::async_trait;
use thiserror::Error;

use jimbo_core::domain::event::{Event, EventId};
use jimbo_core::errors::ApplicationError;

pub mod attendees;
pub mod event;
pub mod memory;

pub use event::SqlEventRepository;
pub use memory::InMemoryEventRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("event `{0}` already exists")]
    DuplicateKey(String),
    #[error("event `{0}` not found")]
    NotFound(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::DuplicateKey(id) => Self::DuplicateEvent(EventId(id)),
            RepositoryError::NotFound(id) => Self::NotFound(EventId(id)),
            RepositoryError::Database(error) => Self::Persistence(error.to_string()),
            RepositoryError::Decode(message) => Self::Persistence(message),
        }
    }
}

/// Persisted events. Attendance lists are replaced wholesale; callers serialize
/// read-modify-write cycles per event. `set_attendance` replaces both lists in one
/// write, so a member moving between them is never stored in both.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: Event) -> Result<(), RepositoryError>;
    async fn get_going(&self, id: &EventId) -> Result<Vec<String>, RepositoryError>;
    async fn get_flaking(&self, id: &EventId) -> Result<Vec<String>, RepositoryError>;
    async fn set_going(&self, id: &EventId, going: &[String]) -> Result<(), RepositoryError>;
    async fn set_flaking(&self, id: &EventId, flaking: &[String]) -> Result<(), RepositoryError>;
    async fn set_attendance(
        &self,
        id: &EventId,
        going: &[String],
        flaking: &[String],
    ) -> Result<(), RepositoryError>;
}
