use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use croner::Cron;
use custodian_core::{AppError, AppResult};


/// Jobs run by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    AuditLogPurge,
    LicenseWarnings,
    ExpiredLicenseNotices,
}

impl JobKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuditLogPurge => "audit_log_purge",
            Self::LicenseWarnings => "license_warnings",
            Self::ExpiredLicenseNotices => "expired_license_notices",
        }
    }
}

struct ScheduledJob {
    kind: JobKind,
    cron: Cron,
    next_run: DateTime<Utc>,
}

/// Cron timetable evaluated in one named time zone.
pub struct JobSchedule {
    time_zone: Tz,
    jobs: Vec<ScheduledJob>,
}

impl JobSchedule {
    /// Parses every pattern and computes first runs strictly after `now`.
    pub fn new(time_zone: Tz, patterns: &[(JobKind, &str)], now: DateTime<Utc>) -> AppResult<Self> {
        let mut jobs = Vec::with_capacity(patterns.len());
        for (kind, pattern) in patterns {
            let cron = Cron::from_str(pattern).map_err(|error| {
                AppError::Validation(format!(
                    "invalid cron pattern '{pattern}' for {}: {error}",
                    kind.as_str()
                ))
            })?;
            let next_run = next_occurrence(&cron, time_zone, now)?;
            jobs.push(ScheduledJob {
                kind: *kind,
                cron,
                next_run,
            });
        }

        Ok(Self { time_zone, jobs })
    }

    /// Returns the job due soonest. Ties go to the first registered job.
    pub fn next_due(&self) -> Option<(JobKind, DateTime<Utc>)> {
        self.jobs
            .iter()
            .min_by_key(|job| job.next_run)
            .map(|job| (job.kind, job.next_run))
    }

    /// Moves `kind` to its first occurrence strictly after `after`.
    pub fn advance(&mut self, kind: JobKind, after: DateTime<Utc>) -> AppResult<()> {
        let time_zone = self.time_zone;
        for job in self.jobs.iter_mut().filter(|job| job.kind == kind) {
            job.next_run = next_occurrence(&job.cron, time_zone, after)?;
        }
        Ok(())
    }
}

fn next_occurrence(cron: &Cron, time_zone: Tz, after: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    cron.find_next_occurrence(&after.with_timezone(&time_zone), false)
        .map(|local| local.with_timezone(&Utc))
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to compute next run in {}: {error}",
                time_zone.name()
            ))
        })
}
