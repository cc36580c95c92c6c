use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use custodian_core::{AppError, AppResult};
use custodian_domain::NotificationKind;

use super::NotificationService;

const MINUTES_PER_DAY: i64 = 24 * 60;

impl NotificationService {
    /// Returns whether a scheduled notification of `kind` was already logged
    /// during the current local day.
    ///
    /// Check-then-send is not atomic: two concurrent triggers can both pass.
    pub async fn already_sent_today(&self, kind: NotificationKind) -> AppResult<bool> {
        let (from, until) = local_day_bounds(self.clock.now(), self.settings.time_zone)?;
        self.email_log_repository
            .has_scheduled_entry_between(kind, from, until)
            .await
    }
}

/// Returns `[start of today, start of tomorrow)` in `time_zone`, as UTC.
pub(super) fn local_day_bounds(
    now: DateTime<Utc>,
    time_zone: Tz,
) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let today = now.with_timezone(&time_zone).date_naive();
    let tomorrow = today.succ_opt().ok_or_else(|| {
        AppError::Internal(format!("no calendar day follows {today}"))
    })?;

    Ok((
        local_midnight(today, time_zone)?,
        local_midnight(tomorrow, time_zone)?,
    ))
}

/// Returns the first instant of `date` in `time_zone`.
///
/// When a DST change skips local midnight, the day starts at the first
/// local minute that exists.
fn local_midnight(date: NaiveDate, time_zone: Tz) -> AppResult<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..MINUTES_PER_DAY)
        .filter_map(|minute| midnight.checked_add_signed(TimeDelta::minutes(minute)))
        .find_map(|local| time_zone.from_local_datetime(&local).earliest())
        .map(|start| start.with_timezone(&Utc))
        .ok_or_else(|| {
            AppError::Internal(format!(
                "no local time of {date} exists in time zone {}",
                time_zone.name()
            ))
        })
}
