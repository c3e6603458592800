use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Chat message id the event is displayed under. Assigned by the platform.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
}

impl EventDetails {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }

        Ok(Self { title, description: description.into(), scheduled_at })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub going: Vec<String>,
    pub flaking: Vec<String>,
}

impl Event {
    /// A freshly confirmed event: nobody has answered yet.
    pub fn confirmed(id: EventId, details: EventDetails) -> Self {
        Self {
            id,
            title: details.title,
            description: details.description,
            scheduled_at: details.scheduled_at,
            going: Vec::new(),
            flaking: Vec::new(),
        }
    }

    pub fn details(&self) -> EventDetails {
        EventDetails {
            title: self.title.clone(),
            description: self.description.clone(),
            scheduled_at: self.scheduled_at,
        }
    }
}
