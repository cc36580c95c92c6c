use async_trait::async_trait;
use chrono::{DateTime, Utc};

use custodian_core::AppResult;
use custodian_domain::{AuditEntryId, AuditRecord};

/// Repository port for bounded audit log deletion.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Returns identifiers of entries stamped strictly before `cutoff`.
    ///
    /// Order is unspecified. Implementations should return at most `limit`
    /// identifiers.
    async fn find_entries_older_than(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<AuditEntryId>>;

    /// Deletes the given entries in one atomic write batch.
    ///
    /// Deleting an entry that no longer exists is a no-op.
    async fn delete_entries(&self, entry_ids: &[AuditEntryId]) -> AppResult<()>;
}

/// Repository port for append-only audit records.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends a record stamped with the store's own clock.
    async fn append_record(&self, record: AuditRecord) -> AppResult<()>;
}
