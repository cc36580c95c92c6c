use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use custodian_application::EmailLogRepository;
use custodian_core::{AppError, AppResult};
use custodian_domain::{EmailLogRecord, NotificationKind};


/// PostgreSQL-backed repository for the `email_logs` table.
#[derive(Clone)]
pub struct PostgresEmailLogRepository {
    pool: PgPool,
}

impl PostgresEmailLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailLogRepository for PostgresEmailLogRepository {
    async fn has_scheduled_entry_between(
        &self,
        kind: NotificationKind,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM email_logs
                WHERE kind = $1
                  AND (metadata->>'scheduled')::BOOLEAN IS TRUE
                  AND created_at >= $2
                  AND created_at < $3
            )
            "#,
        )
        .bind(kind.as_str())
        .bind(from)
        .bind(until)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to check email log for '{}' dispatch: {error}",
                kind.as_str()
            ))
        })
    }

    async fn append_entry(&self, record: EmailLogRecord) -> AppResult<()> {
        let metadata = serde_json::to_value(&record.metadata).map_err(|error| {
            AppError::Internal(format!("failed to serialize email log metadata: {error}"))
        })?;
        let license_count = i32::try_from(record.license_count).map_err(|_| {
            AppError::Validation(format!(
                "email log license count {} exceeds storage range",
                record.license_count
            ))
        })?;

        sqlx::query(
            r#"
            INSERT INTO email_logs (
                kind,
                status,
                recipient_email,
                subject,
                license_count,
                license_ids,
                error_message,
                metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.kind.as_str())
        .bind(record.status.as_str())
        .bind(record.recipient_email)
        .bind(record.subject)
        .bind(license_count)
        .bind(record.license_ids)
        .bind(record.error_message)
        .bind(metadata)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to append email log entry: {error}"))
        })?;

        Ok(())
    }
}
