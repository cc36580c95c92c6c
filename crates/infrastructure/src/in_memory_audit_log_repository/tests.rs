use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use custodian_application::{
    AuditLogRepository, AuditRepository, Clock, RetentionService, RetentionSettings,
};
use custodian_core::{AppResult, UserIdentity};
use custodian_domain::{AuditEntryId, AuditRecord, AuditScope};
use tokio::sync::Mutex;

use super::InMemoryAuditLogRepository;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Records the size of every delete batch before forwarding it.
struct BatchRecordingLog {
    inner: Arc<InMemoryAuditLogRepository>,
    committed: Mutex<Vec<usize>>,
}

#[async_trait]
impl AuditLogRepository for BatchRecordingLog {
    async fn find_entries_older_than(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<AuditEntryId>> {
        self.inner.find_entries_older_than(cutoff, limit).await
    }

    async fn delete_entries(&self, entry_ids: &[AuditEntryId]) -> AppResult<()> {
        self.committed.lock().await.push(entry_ids.len());
        self.inner.delete_entries(entry_ids).await
    }
}

struct Harness {
    store: Arc<InMemoryAuditLogRepository>,
    log: Arc<BatchRecordingLog>,
    service: RetentionService,
}

fn harness() -> Harness {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));
    let store = Arc::new(InMemoryAuditLogRepository::new(clock.clone()));
    let log = Arc::new(BatchRecordingLog {
        inner: store.clone(),
        committed: Mutex::new(Vec::new()),
    });
    let audit: Arc<dyn AuditRepository> = store.clone();
    let service = RetentionService::new(log.clone(), audit, clock, RetentionSettings::default());

    Harness {
        store,
        log,
        service,
    }
}

#[tokio::test]
async fn scheduled_purge_removes_stale_entries_in_capped_batches() {
    let harness = harness();
    for _ in 0..501 {
        harness.store.seed_entry(fixed_now() - Duration::days(400)).await;
    }
    for _ in 0..3 {
        harness.store.seed_entry(fixed_now() - Duration::days(10)).await;
    }

    let deleted = harness.service.run_scheduled_purge().await;
    assert_eq!(deleted.ok(), Some(501));
    assert_eq!(*harness.log.committed.lock().await, vec![500, 1]);

    let entries = harness.store.entries().await;
    assert_eq!(entries.len(), 4);
    assert_eq!(
        entries
            .iter()
            .filter(|entry| entry.created_at == fixed_now() - Duration::days(10))
            .count(),
        3
    );

    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    let record: &AuditRecord = &records[0];
    assert_eq!(record.scope, AuditScope::System);
    assert_eq!(record.metadata.cleanup_type, "scheduled_cleanup");
    assert_eq!(record.metadata.records_deleted, Some(501));
    assert_eq!(record.metadata.days_kept, Some(365));
    assert!(
        entries
            .iter()
            .any(|entry| entry.record.is_some() && entry.created_at == fixed_now())
    );
}

#[tokio::test]
async fn scheduled_purge_with_nothing_stale_still_writes_one_record() {
    let harness = harness();
    harness.store.seed_entry(fixed_now() - Duration::days(1)).await;

    let deleted = harness.service.run_scheduled_purge().await;
    assert_eq!(deleted.ok(), Some(0));
    assert!(harness.log.committed.lock().await.is_empty());

    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].metadata.records_deleted, Some(0));
}

#[tokio::test]
async fn manual_purge_applies_requested_window() {
    let harness = harness();
    harness.store.seed_entry(fixed_now() - Duration::days(10)).await;
    harness.store.seed_entry(fixed_now() - Duration::days(2)).await;

    let caller = UserIdentity::new(
        "operator-1",
        Some("Operator".to_owned()),
        Some("operator@example.com".to_owned()),
    );
    let result = harness.service.run_manual_purge(Some(&caller), Some(5)).await;

    let Ok(result) = result else {
        panic!("manual purge should succeed");
    };
    assert!(result.success);
    assert_eq!(result.deleted_count, 1);
    assert_eq!(result.days_kept, 5);

    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].scope, AuditScope::Manual);
    assert_eq!(records[0].actor.id, "operator-1");
    assert_eq!(records[0].metadata.cleanup_type, "manual_cleanup");
    assert_eq!(harness.store.entries().await.len(), 2);
}
