use std::sync::Arc;

use jimbo_core::config::AppConfig;
use jimbo_db::{connect_with_config, migrations, DbPool, EventRepository, SqlEventRepository};
use jimbo_gateway::{
    client::{GatewayClient, NoopGatewayClient},
    events::{ComponentHandler, EventDispatcher, SlashCommandHandler},
    socket::{GatewayRunner, NoopSocketTransport, ReconnectPolicy, SocketTransport},
};
use thiserror::Error;
use tracing::info;

use crate::lifecycle::EventLifecycleService;
use crate::locks::EventLocks;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub runner: GatewayRunner,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let runner = wire_runner(
        Arc::new(SqlEventRepository::new(db_pool.clone())),
        Arc::new(NoopSocketTransport),
        Arc::new(NoopGatewayClient),
    );

    Ok(Application { config, db_pool, runner })
}

/// Builds the interaction pipeline around an event store and a platform connection.
pub fn wire_runner(
    repository: Arc<dyn EventRepository>,
    transport: Arc<dyn SocketTransport>,
    client: Arc<dyn GatewayClient>,
) -> GatewayRunner {
    let service = EventLifecycleService::new(repository, Arc::clone(&client), EventLocks::new());

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(SlashCommandHandler::new(service.clone()));
    dispatcher.register(ComponentHandler::new(service));

    GatewayRunner::new(transport, dispatcher, client, ReconnectPolicy::default())
}
