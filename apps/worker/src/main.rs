//! Custodian scheduled job runner.

#![forbid(unsafe_code)]

mod schedule;
mod worker_config;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use custodian_application::{Clock, EmailRelay, NotificationService, RetentionService};
use custodian_core::{AppError, AppResult};
use custodian_infrastructure::{
    ConsoleEmailRelay, HttpEmailRelay, PostgresAuditLogRepository, PostgresEmailLogRepository,
    PostgresLicenseRepository, SystemClock,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::schedule::{JobKind, JobSchedule};
use crate::worker_config::{EmailRelayConfig, WorkerConfig};

struct WorkerServices {
    retention: RetentionService,
    notifications: NotificationService,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let pool = connect_pool(config.database_url.as_str()).await?;
    let services = build_services(pool, &config)?;

    let mut schedule = JobSchedule::new(
        config.time_zone,
        &[
            (JobKind::AuditLogPurge, config.schedules.purge.as_str()),
            (JobKind::LicenseWarnings, config.schedules.warning.as_str()),
            (
                JobKind::ExpiredLicenseNotices,
                config.schedules.expired.as_str(),
            ),
        ],
        Utc::now(),
    )?;

    info!(
        time_zone = config.time_zone.name(),
        purge_schedule = %config.schedules.purge,
        warning_schedule = %config.schedules.warning,
        expired_schedule = %config.schedules.expired,
        "custodian-worker started"
    );

    loop {
        let Some((kind, due_at)) = schedule.next_due() else {
            return Err(AppError::Internal("no jobs scheduled".to_owned()));
        };

        info!(job = kind.as_str(), %due_at, "waiting for next scheduled job");
        let wait = (due_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tokio::time::sleep(wait).await;

        run_job(&services, kind).await;
        schedule.advance(kind, Utc::now().max(due_at))?;
    }
}

async fn run_job(services: &WorkerServices, kind: JobKind) {
    info!(job = kind.as_str(), "running scheduled job");

    let outcome = match kind {
        JobKind::AuditLogPurge => services
            .retention
            .run_scheduled_purge()
            .await
            .map(|deleted_count| format!("deleted {deleted_count} audit log entries")),
        JobKind::LicenseWarnings => services
            .notifications
            .send_license_warnings()
            .await
            .map(|result| format!("sent={} count={}", result.sent, result.count)),
        JobKind::ExpiredLicenseNotices => services
            .notifications
            .send_expired_license_notices()
            .await
            .map(|result| format!("sent={} count={}", result.sent, result.count)),
    };

    match outcome {
        Ok(summary) => info!(job = kind.as_str(), %summary, "scheduled job finished"),
        Err(error) => error!(job = kind.as_str(), error = %error, "scheduled job failed"),
    }
}

fn build_services(pool: PgPool, config: &WorkerConfig) -> AppResult<WorkerServices> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool.clone()));

    let email_relay: Arc<dyn EmailRelay> = match &config.email_relay {
        EmailRelayConfig::Console => Arc::new(ConsoleEmailRelay::new()),
        EmailRelayConfig::Http(relay_config) => {
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;
            Arc::new(HttpEmailRelay::new(http_client, relay_config.clone()))
        }
    };

    Ok(WorkerServices {
        retention: RetentionService::new(
            audit_log_repository.clone(),
            audit_log_repository,
            clock.clone(),
            config.retention.clone(),
        ),
        notifications: NotificationService::new(
            Arc::new(PostgresLicenseRepository::new(pool.clone())),
            Arc::new(PostgresEmailLogRepository::new(pool)),
            email_relay,
            clock,
            config.notifications.clone(),
        ),
    })
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
