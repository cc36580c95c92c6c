//! Audit log retention: bounded batch purge plus one audit record per run.

mod audit_recorder;
mod batch_deleter;


use std::sync::Arc;

use chrono::{DateTime, Days, Utc};
use tracing::{error, info};

use custodian_core::{AppError, AppResult, UserIdentity};
use custodian_domain::{AuditActor, AuditScope};

use crate::Clock;
use crate::retention_ports::{AuditLogRepository, AuditRepository};

pub use audit_recorder::AuditRecorder;
pub use batch_deleter::{BatchDeleter, MAX_WRITE_BATCH_SIZE, PurgeInterrupted};

/// Retention window applied when an on-demand request names none.
pub const DEFAULT_DAYS_TO_KEEP: u32 = 365;

/// Configuration for retention runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionSettings {
    /// Retention window for scheduled runs, in days.
    pub retention_days: u32,
    /// Deletions per atomic batch, clamped to [`MAX_WRITE_BATCH_SIZE`].
    pub batch_size: usize,
    /// Email recorded for the system actor.
    pub system_actor_email: String,
}

impl RetentionSettings {
    /// Rejects a zero retention window and batch sizes outside
    /// `1..=MAX_WRITE_BATCH_SIZE`.
    pub fn validate(&self) -> AppResult<()> {
        if self.retention_days == 0 {
            return Err(AppError::Validation(
                "retention window must be at least one day".to_owned(),
            ));
        }
        if self.batch_size == 0 || self.batch_size > MAX_WRITE_BATCH_SIZE {
            return Err(AppError::Validation(format!(
                "purge batch size must be between 1 and {MAX_WRITE_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }

        Ok(())
    }
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_DAYS_TO_KEEP,
            batch_size: MAX_WRITE_BATCH_SIZE,
            system_actor_email: "system@custodian.local".to_owned(),
        }
    }
}

/// Result returned to on-demand purge callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualPurgeResult {
    /// Always true for a completed run.
    pub success: bool,
    /// Number of deleted entries.
    pub deleted_count: u64,
    /// Effective retention window in days.
    pub days_kept: u32,
}

/// Application service for audit log retention runs.
#[derive(Clone)]
pub struct RetentionService {
    deleter: BatchDeleter,
    recorder: AuditRecorder,
    clock: Arc<dyn Clock>,
    settings: RetentionSettings,
}

impl RetentionService {
    /// Creates a retention service from its ports.
    #[must_use]
    pub fn new(
        audit_log_repository: Arc<dyn AuditLogRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        clock: Arc<dyn Clock>,
        settings: RetentionSettings,
    ) -> Self {
        Self {
            deleter: BatchDeleter::new(audit_log_repository),
            recorder: AuditRecorder::new(audit_repository),
            clock,
            settings,
        }
    }

    /// Runs the scheduled purge with the configured retention window.
    ///
    /// Store failures are re-raised after the failure record is written so
    /// the scheduler can report them.
    pub async fn run_scheduled_purge(&self) -> AppResult<u64> {
        let days_kept = self.settings.retention_days;
        info!(days_kept, "starting scheduled audit log cleanup");

        let actor = AuditActor::system(self.settings.system_actor_email.as_str());
        match self.purge_and_record(actor, AuditScope::System, days_kept).await {
            Ok(deleted_count) => {
                info!(deleted_count, days_kept, "scheduled audit log cleanup completed");
                Ok(deleted_count)
            }
            Err(interrupted) => {
                error!(
                    deleted_count = interrupted.deleted_count,
                    error = %interrupted.source,
                    "scheduled audit log cleanup failed"
                );
                Err(interrupted.source)
            }
        }
    }

    /// Runs an on-demand purge for an authenticated caller.
    ///
    /// A missing or zero `days_to_keep` falls back to [`DEFAULT_DAYS_TO_KEEP`].
    pub async fn run_manual_purge(
        &self,
        caller: Option<&UserIdentity>,
        days_to_keep: Option<u32>,
    ) -> AppResult<ManualPurgeResult> {
        let caller = caller
            .ok_or_else(|| AppError::Unauthorized("user must be authenticated".to_owned()))?;
        let days_kept = days_to_keep
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_DAYS_TO_KEEP);
        info!(
            subject = caller.subject(),
            days_kept, "starting manual audit log cleanup"
        );

        let actor = AuditActor::from_identity(caller);
        match self.purge_and_record(actor, AuditScope::Manual, days_kept).await {
            Ok(deleted_count) => Ok(ManualPurgeResult {
                success: true,
                deleted_count,
                days_kept,
            }),
            Err(interrupted) => {
                error!(
                    subject = caller.subject(),
                    deleted_count = interrupted.deleted_count,
                    error = %interrupted.source,
                    "manual audit log cleanup failed"
                );
                Err(AppError::Internal(format!(
                    "cleanup failed: {}",
                    interrupted.source
                )))
            }
        }
    }

    async fn purge_and_record(
        &self,
        actor: AuditActor,
        scope: AuditScope,
        days_kept: u32,
    ) -> Result<u64, PurgeInterrupted> {
        let outcome = match cutoff_for(self.clock.now(), days_kept) {
            Ok(cutoff) => self.deleter.purge(cutoff, self.settings.batch_size).await,
            Err(source) => Err(PurgeInterrupted {
                deleted_count: 0,
                source,
            }),
        };

        self.recorder
            .record_purge_outcome(actor, scope, &outcome, days_kept, self.clock.now())
            .await;

        outcome
    }
}

fn cutoff_for(now: DateTime<Utc>, days_kept: u32) -> AppResult<DateTime<Utc>> {
    now.checked_sub_days(Days::new(u64::from(days_kept)))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "retention window of {days_kept} day(s) is out of range"
            ))
        })
}
