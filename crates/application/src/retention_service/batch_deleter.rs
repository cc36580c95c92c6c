use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use custodian_core::AppError;
use custodian_domain::AuditEntryId;

use crate::retention_ports::AuditLogRepository;

/// Largest atomic write batch the store accepts.
pub const MAX_WRITE_BATCH_SIZE: usize = 500;

/// A purge run aborted by a store failure.
#[derive(Debug, Error)]
#[error("purge interrupted after deleting {deleted_count} entries: {source}")]
pub struct PurgeInterrupted {
    /// Entries deleted by batches committed before the failure.
    pub deleted_count: u64,
    /// Underlying store failure.
    #[source]
    pub source: AppError,
}

#[derive(Debug, Default)]
struct PurgeCursor {
    total_deleted: u64,
    current_batch_size: usize,
}

impl PurgeCursor {
    fn interrupt(&self, source: AppError) -> PurgeInterrupted {
        PurgeInterrupted {
            deleted_count: self.total_deleted,
            source,
        }
    }
}

/// Deletes stale audit entries in capped atomic batches.
#[derive(Clone)]
pub struct BatchDeleter {
    repository: Arc<dyn AuditLogRepository>,
}

impl BatchDeleter {
    /// Creates a deleter over the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    /// Deletes every entry stamped before `cutoff` and returns the count.
    ///
    /// Pages are queried and committed strictly one after another. The loop
    /// stops on an empty page or after committing a page shorter than the
    /// cap. A failed query or commit stops the run immediately; the error
    /// carries the count committed so far and nothing is retried.
    pub async fn purge(
        &self,
        cutoff: DateTime<Utc>,
        batch_cap: usize,
    ) -> Result<u64, PurgeInterrupted> {
        let batch_cap = batch_cap.clamp(1, MAX_WRITE_BATCH_SIZE);
        let mut cursor = PurgeCursor::default();

        loop {
            let page = self
                .repository
                .find_entries_older_than(cutoff, batch_cap)
                .await
                .map_err(|error| cursor.interrupt(error))?;

            if page.is_empty() {
                break;
            }

            let page_len = page.len();
            let batch: Vec<AuditEntryId> = page.into_iter().take(batch_cap).collect();
            cursor.current_batch_size = batch.len();

            self.repository
                .delete_entries(&batch)
                .await
                .map_err(|error| cursor.interrupt(error))?;

            cursor.total_deleted = cursor
                .total_deleted
                .saturating_add(u64::try_from(cursor.current_batch_size).unwrap_or(u64::MAX));
            info!(
                batch_size = cursor.current_batch_size,
                total_deleted = cursor.total_deleted,
                "deleted audit log batch"
            );
            cursor.current_batch_size = 0;

            if page_len < batch_cap {
                break;
            }
        }

        Ok(cursor.total_deleted)
    }
}
