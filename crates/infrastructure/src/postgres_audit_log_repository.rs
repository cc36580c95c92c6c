use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use custodian_application::{AuditLogRepository, AuditRepository};
use custodian_core::{AppError, AppResult};
use custodian_domain::{AuditEntryId, AuditRecord};


/// PostgreSQL-backed repository for the `audit_logs` table.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn find_entries_older_than(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<AuditEntryId>> {
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id
            FROM audit_logs
            WHERE created_at < $1
            LIMIT $2
            "#,
        )
        .bind(cutoff)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to query audit log entries older than {cutoff}: {error}"
            ))
        })?;

        Ok(ids.into_iter().map(AuditEntryId::from_uuid).collect())
    }

    async fn delete_entries(&self, entry_ids: &[AuditEntryId]) -> AppResult<()> {
        let ids: Vec<uuid::Uuid> = entry_ids.iter().map(AuditEntryId::as_uuid).collect();

        sqlx::query(
            r#"
            DELETE FROM audit_logs
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to commit audit log delete batch of {} entries: {error}",
                entry_ids.len()
            ))
        })?;

        Ok(())
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditLogRepository {
    async fn append_record(&self, record: AuditRecord) -> AppResult<()> {
        let metadata = serde_json::to_value(&record.metadata).map_err(|error| {
            AppError::Internal(format!("failed to serialize audit metadata: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                actor_id,
                actor_email,
                actor_display_name,
                scope,
                action,
                module,
                description,
                metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.actor.id)
        .bind(record.actor.email)
        .bind(record.actor.display_name)
        .bind(record.scope.as_str())
        .bind(record.action)
        .bind(record.module)
        .bind(record.description)
        .bind(metadata)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit record: {error}")))?;

        Ok(())
    }
}
