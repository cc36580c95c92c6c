use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use custodian_application::{AuditLogRepository, AuditRepository, Clock};
use custodian_core::AppResult;
use custodian_domain::{AuditEntryId, AuditRecord};
use tokio::sync::RwLock;

#[cfg(test)]
mod tests;

/// One stored audit document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAuditEntry {
    /// Store identifier.
    pub id: AuditEntryId,
    /// Server timestamp.
    pub created_at: DateTime<Utc>,
    /// Purge outcome payload, absent for seeded activity entries.
    pub record: Option<AuditRecord>,
}

/// In-memory audit log store.
///
/// Appended records are stamped with the injected clock.
pub struct InMemoryAuditLogRepository {
    clock: Arc<dyn Clock>,
    entries: RwLock<Vec<StoredAuditEntry>>,
}

impl InMemoryAuditLogRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Inserts an activity entry with an explicit timestamp.
    pub async fn seed_entry(&self, created_at: DateTime<Utc>) -> AuditEntryId {
        let id = AuditEntryId::new();
        self.entries.write().await.push(StoredAuditEntry {
            id,
            created_at,
            record: None,
        });
        id
    }

    /// Returns a snapshot of every stored entry in insertion order.
    pub async fn entries(&self) -> Vec<StoredAuditEntry> {
        self.entries.read().await.clone()
    }

    /// Returns the purge outcome records appended so far.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.entries
            .read()
            .await
            .iter()
            .filter_map(|entry| entry.record.clone())
            .collect()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn find_entries_older_than(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<AuditEntryId>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|entry| entry.created_at < cutoff)
            .take(limit)
            .map(|entry| entry.id)
            .collect())
    }

    async fn delete_entries(&self, entry_ids: &[AuditEntryId]) -> AppResult<()> {
        let doomed: HashSet<AuditEntryId> = entry_ids.iter().copied().collect();
        self.entries
            .write()
            .await
            .retain(|entry| !doomed.contains(&entry.id));
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditLogRepository {
    async fn append_record(&self, record: AuditRecord) -> AppResult<()> {
        let created_at = self.clock.now();
        self.entries.write().await.push(StoredAuditEntry {
            id: AuditEntryId::new(),
            created_at,
            record: Some(record),
        });
        Ok(())
    }
}
