use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::error;

use custodian_domain::{AuditActor, AuditRecord, AuditScope};

use super::PurgeInterrupted;
use crate::retention_ports::AuditRepository;

/// Best-effort writer of purge outcome records.
#[derive(Clone)]
pub struct AuditRecorder {
    repository: Arc<dyn AuditRepository>,
}

impl AuditRecorder {
    /// Creates a recorder over the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditRepository>) -> Self {
        Self { repository }
    }

    /// Appends the success or failure record for one purge run.
    ///
    /// A failed append is logged and swallowed so it never replaces the
    /// run's own result.
    pub async fn record_purge_outcome(
        &self,
        actor: AuditActor,
        scope: AuditScope,
        outcome: &Result<u64, PurgeInterrupted>,
        days_kept: u32,
        finished_at: DateTime<Utc>,
    ) {
        let record = match outcome {
            Ok(deleted_count) => {
                AuditRecord::purge_succeeded(actor, scope, *deleted_count, days_kept, finished_at)
            }
            Err(interrupted) => AuditRecord::purge_failed(actor, scope, interrupted.to_string()),
        };

        if let Err(append_error) = self.repository.append_record(record).await {
            error!(
                scope = scope.as_str(),
                error = %append_error,
                "could not record audit log cleanup outcome"
            );
        }
    }
}
