use std::sync::Arc;

use custodian_application::RetentionService;
use custodian_core::AppError;
use custodian_infrastructure::{PostgresAuditLogRepository, SystemClock};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool));

    AppState {
        retention_service: RetentionService::new(
            audit_log_repository.clone(),
            audit_log_repository,
            Arc::new(SystemClock),
            config.retention.clone(),
        ),
        shared_secret: Arc::from(config.shared_secret.as_str()),
    }
}
