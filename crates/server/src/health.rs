use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use jimbo_db::{migrations, DbPool};
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    Degraded,
}

/// What the bot can tell about its event store without touching any event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventStoreHealth {
    pub status: Readiness,
    pub schema_version: Option<i64>,
    pub expected_version: i64,
    pub stored_events: Option<i64>,
    pub detail: String,
}

impl EventStoreHealth {
    fn degraded(schema_version: Option<i64>, detail: String) -> Self {
        Self {
            status: Readiness::Degraded,
            schema_version,
            expected_version: migrations::latest_version(),
            stored_events: None,
            detail,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: Readiness,
    pub event_store: EventStoreHealth,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { db_pool })
}

pub async fn spawn(bind_address: &str, port: u16, db_pool: DbPool) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(db_pool)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %error,
                "health endpoint stopped"
            );
        }
    });

    Ok(())
}

/// `200 ready` once the store answers at the embedded schema version, `503 degraded`
/// otherwise.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let event_store = event_store_check(&state.db_pool).await;
    let status = event_store.status;

    let status_code = match status {
        Readiness::Ready => StatusCode::OK,
        Readiness::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(HealthResponse { status, event_store, checked_at: Utc::now().to_rfc3339() }))
}

async fn event_store_check(pool: &DbPool) -> EventStoreHealth {
    let expected_version = migrations::latest_version();
    let schema_version = match migrations::applied_version(pool).await {
        Ok(version) => version,
        Err(error) => {
            return EventStoreHealth::degraded(None, format!("event store unreachable: {error}"))
        }
    };

    if schema_version != Some(expected_version) {
        return EventStoreHealth::degraded(
            schema_version,
            format!("event store schema is not at migration {expected_version}; run `jimbo migrate`"),
        );
    }

    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM Events").fetch_one(pool).await {
        Ok(count) => EventStoreHealth {
            status: Readiness::Ready,
            schema_version,
            expected_version,
            stored_events: Some(count),
            detail: format!("{count} confirmed events stored"),
        },
        Err(error) => {
            EventStoreHealth::degraded(schema_version, format!("Events query failed: {error}"))
        }
    }
}
