use jimbo_core::attendance::RsvpChoice;
use jimbo_core::domain::event::{Event, EventId};
use sqlx::Row;

use super::{attendees, EventRepository, RepositoryError};
use crate::DbPool;

pub struct SqlEventRepository {
    pool: DbPool,
}

impl SqlEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn get_list(
        &self,
        id: &EventId,
        choice: RsvpChoice,
    ) -> Result<Vec<String>, RepositoryError> {
        let sql = match choice {
            RsvpChoice::Going => "SELECT Going AS list FROM Events WHERE MessageID = ?",
            RsvpChoice::Flaking => "SELECT Flaking AS list FROM Events WHERE MessageID = ?",
        };

        let row = sqlx::query(sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id.0.clone()))?;

        let raw: Option<String> =
            row.try_get("list").map_err(|e| RepositoryError::Decode(e.to_string()))?;
        Ok(attendees::decode(raw.as_deref().unwrap_or_default()))
    }

    async fn set_list(
        &self,
        id: &EventId,
        choice: RsvpChoice,
        names: &[String],
    ) -> Result<(), RepositoryError> {
        let sql = match choice {
            RsvpChoice::Going => "UPDATE Events SET Going = ? WHERE MessageID = ?",
            RsvpChoice::Flaking => "UPDATE Events SET Flaking = ? WHERE MessageID = ?",
        };

        let result = sqlx::query(sql)
            .bind(attendees::encode(names)?)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.0.clone()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl EventRepository for SqlEventRepository {
    async fn insert(&self, event: Event) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO Events (MessageID, Title, Date, Details, Going, Flaking)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(event.id.as_str())
        .bind(&event.title)
        .bind(event.scheduled_at.timestamp().to_string())
        .bind(&event.description)
        .bind(attendees::encode(&event.going)?)
        .bind(attendees::encode(&event.flaking)?)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(error)) if error.is_unique_violation() => {
                Err(RepositoryError::DuplicateKey(event.id.0))
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn get_going(&self, id: &EventId) -> Result<Vec<String>, RepositoryError> {
        self.get_list(id, RsvpChoice::Going).await
    }

    async fn get_flaking(&self, id: &EventId) -> Result<Vec<String>, RepositoryError> {
        self.get_list(id, RsvpChoice::Flaking).await
    }

    async fn set_going(&self, id: &EventId, going: &[String]) -> Result<(), RepositoryError> {
        self.set_list(id, RsvpChoice::Going, going).await
    }

    async fn set_flaking(&self, id: &EventId, flaking: &[String]) -> Result<(), RepositoryError> {
        self.set_list(id, RsvpChoice::Flaking, flaking).await
    }

    async fn set_attendance(
        &self,
        id: &EventId,
        going: &[String],
        flaking: &[String],
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE Events SET Going = ?, Flaking = ? WHERE MessageID = ?")
            .bind(attendees::encode(going)?)
            .bind(attendees::encode(flaking)?)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.0.clone()));
        }
        Ok(())
    }
}
