use jimbo_core::config::{AppConfig, LoadOptions};
use jimbo_db::{connect_with_config, migrations};

use crate::commands::{CommandResult, FailureClass};

pub fn run() -> CommandResult {
    run_with(LoadOptions::default())
}

pub fn run_with(options: LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
                FailureClass::ConfigValidation,
                format!("configuration issue: {error}"),
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
                FailureClass::RuntimeInit,
                format!("failed to initialize async runtime: {error}"),
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| (FailureClass::DbConnectivity, error.to_string()))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| (FailureClass::Migration, error.to_string()))?;
        pool.close().await;
        Ok::<(), (FailureClass, String)>(())
    });

    match result {
        Ok(()) => CommandResult::success(
            "migrate",
            format!("event store is at migration {}", migrations::latest_version()),
        ),
        Err((class, message)) => CommandResult::failure("migrate", class, message),
    }
}
