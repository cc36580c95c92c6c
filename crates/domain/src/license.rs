use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status value that marks a license as expired regardless of its date.
pub const EXPIRED_LICENSE_STATUS: &str = "vencida";

/// License tracked for expiry notifications. Read-only to this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Stable document identifier.
    pub id: String,
    /// License display name.
    pub name: String,
    /// Two-letter region (UF) code.
    pub region_code: String,
    /// Free-form status maintained by operators.
    pub status: Option<String>,
    /// Expiry date as stored, expected in `DD-MM-YYYY` form.
    pub expiry_date: Option<String>,
}

impl LicenseRecord {
    /// Returns whether operators already flagged the license as expired.
    #[must_use]
    pub fn is_marked_expired(&self) -> bool {
        self.status.as_deref() == Some(EXPIRED_LICENSE_STATUS)
    }

    /// Returns the parsed expiry date, if the stored value is well formed.
    #[must_use]
    pub fn parsed_expiry_date(&self) -> Option<NaiveDate> {
        self.expiry_date.as_deref().and_then(parse_expiry_date)
    }
}

/// Parses a `DD-MM-YYYY` date.
///
/// Day and month accept one or two digits, the year exactly four. Anything
/// else, including calendar-invalid dates, yields `None`.
#[must_use]
pub fn parse_expiry_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.trim().split('-');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    if !is_digit_field(day, 1, 2) || !is_digit_field(month, 1, 2) || !is_digit_field(year, 4, 4)
    {
        return None;
    }

    let day = day.parse::<u32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    let year = year.parse::<i32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn is_digit_field(value: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&value.len()) && value.bytes().all(|byte| byte.is_ascii_digit())
}

/// Expiry classification of one license on a given calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLicense<'a> {
    /// Classified license.
    pub license: &'a LicenseRecord,
    /// Whole calendar days until expiry; negative when overdue, zero when
    /// the date is today or could not be parsed.
    pub remaining_days: i64,
    /// Expired by status or by date.
    pub is_expired: bool,
    /// Expires within the warning window, strictly after today.
    pub is_warning: bool,
}

impl ClassifiedLicense<'_> {
    /// Returns the number of days since expiry.
    #[must_use]
    pub fn days_overdue(&self) -> i64 {
        -self.remaining_days
    }
}

/// Classifies a license against `today` in the operator's time zone.
///
/// Malformed or missing dates never fail: they classify as zero remaining
/// days and not date-expired, so one bad document cannot abort a scan.
#[must_use]
pub fn classify(
    license: &LicenseRecord,
    warning_window_days: u32,
    today: NaiveDate,
) -> ClassifiedLicense<'_> {
    let expiry_date = license.parsed_expiry_date();
    let remaining_days = expiry_date.map_or(0, |date| (date - today).num_days());

    let is_expired = license.is_marked_expired() || (expiry_date.is_some() && remaining_days <= 0);
    let is_warning = remaining_days > 0 && remaining_days <= i64::from(warning_window_days);

    ClassifiedLicense {
        license,
        remaining_days,
        is_expired,
        is_warning,
    }
}
