use jimbo_core::config::{AppConfig, LoadOptions};
use jimbo_db::{connect_with_config, DbPool};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::commands::{CommandResult, FailureClass};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str, reason: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const CONFIG_CHECK: &str = "config_validation";
const TOKEN_CHECK: &str = "bot_token_readiness";
const DATABASE_CHECK: &str = "database_connectivity";
const SCHEMA_CHECK: &str = "event_store_schema";

pub fn run(json_output: bool) -> CommandResult {
    run_with(LoadOptions::default(), json_output)
}

/// Exits non-zero with the class of the first failing check.
pub fn run_with(options: LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code = report.failure_class().map_or(0, FailureClass::exit_code);

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            serde_json::json!({
                "overall_status": "fail",
                "summary": "doctor serialization failed",
                "error": error.to_string(),
            })
            .to_string()
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

impl DoctorReport {
    fn failure_class(&self) -> Option<FailureClass> {
        self.checks.iter().find(|check| check.status == CheckStatus::Fail).map(|check| {
            match check.name {
                DATABASE_CHECK => FailureClass::DbConnectivity,
                SCHEMA_CHECK => FailureClass::Migration,
                _ => FailureClass::ConfigValidation,
            }
        })
    }
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck::pass(CONFIG_CHECK, "configuration loaded and validated"));
            checks.push(check_bot_token(&config));
            checks.extend(check_event_store(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck::fail(CONFIG_CHECK, error.to_string()));
            for name in [TOKEN_CHECK, DATABASE_CHECK, SCHEMA_CHECK] {
                checks.push(DoctorCheck::skipped(name, "configuration did not load"));
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_bot_token(config: &AppConfig) -> DoctorCheck {
    let token = config.gateway.bot_token.expose_secret();
    if token.trim() != token {
        return DoctorCheck::fail(TOKEN_CHECK, "bot token has leading or trailing whitespace");
    }
    DoctorCheck::pass(TOKEN_CHECK, format!("bot token present ({} chars, redacted)", token.len()))
}

fn check_event_store(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![
                DoctorCheck::fail(
                    DATABASE_CHECK,
                    format!("failed to initialize async runtime: {error}"),
                ),
                DoctorCheck::skipped(SCHEMA_CHECK, "the database was not reachable"),
            ];
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_config(&config.database).await {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck::fail(DATABASE_CHECK, format!("failed to connect to database: {error}")),
                    DoctorCheck::skipped(SCHEMA_CHECK, "the database was not reachable"),
                ];
            }
        };

        let checks = vec![
            DoctorCheck::pass(DATABASE_CHECK, format!("connected using `{}`", config.database.url)),
            check_schema(&pool).await,
        ];
        pool.close().await;
        checks
    })
}

async fn check_schema(pool: &DbPool) -> DoctorCheck {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'Events'",
    )
    .fetch_one(pool)
    .await;

    match found {
        Ok(1) => DoctorCheck::pass(SCHEMA_CHECK, "Events table present"),
        Ok(_) => DoctorCheck::fail(SCHEMA_CHECK, "Events table missing; run `jimbo migrate`"),
        Err(error) => DoctorCheck::fail(SCHEMA_CHECK, format!("schema query failed: {error}")),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
