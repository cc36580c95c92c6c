use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use custodian_application::{Clock, EmailLogRepository};
use custodian_core::AppResult;
use custodian_domain::{EmailLogRecord, NotificationKind};
use tokio::sync::RwLock;


/// One stored email log entry with its server timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEmailLog {
    /// Server timestamp.
    pub created_at: DateTime<Utc>,
    /// Logged dispatch attempt.
    pub record: EmailLogRecord,
}

/// In-memory email log store.
pub struct InMemoryEmailLogRepository {
    clock: Arc<dyn Clock>,
    entries: RwLock<Vec<StoredEmailLog>>,
}

impl InMemoryEmailLogRepository {
    /// Creates an empty store stamped by `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Inserts an entry with an explicit timestamp.
    pub async fn seed_entry(&self, created_at: DateTime<Utc>, record: EmailLogRecord) {
        self.entries
            .write()
            .await
            .push(StoredEmailLog { created_at, record });
    }

    /// Returns a snapshot of every stored entry.
    pub async fn entries(&self) -> Vec<StoredEmailLog> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl EmailLogRepository for InMemoryEmailLogRepository {
    async fn has_scheduled_entry_between(
        &self,
        kind: NotificationKind,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<bool> {
        Ok(self.entries.read().await.iter().any(|entry| {
            entry.record.kind == kind
                && entry.record.is_scheduled()
                && entry.created_at >= from
                && entry.created_at < until
        }))
    }

    async fn append_entry(&self, record: EmailLogRecord) -> AppResult<()> {
        let created_at = self.clock.now();
        self.entries
            .write()
            .await
            .push(StoredEmailLog { created_at, record });
        Ok(())
    }
}
