use serde::{Deserialize, Serialize};

/// Module label written on license notification logs.
pub const LICENSE_NOTIFICATION_MODULE: &str = "licenses";

/// Notification families dispatched once per local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    /// Licenses that expire within the warning window.
    LicenseWarning,
    /// Licenses already expired.
    LicenseExpired,
}

impl NotificationKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LicenseWarning => "licenseWarning",
            Self::LicenseExpired => "licenseExpired",
        }
    }
}

/// Outcome of one relay call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Relay accepted the message.
    Sent,
    /// Relay rejected the message or was unreachable.
    Failed,
}

impl DispatchStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// Structured context attached to an email log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLogMetadata {
    /// Owning module label.
    pub module: String,
    /// Relay template identifier.
    pub template_id: String,
    /// Warning window in days, warning notifications only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_threshold: Option<u32>,
    /// Largest overdue day count, expired notifications only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_days_expired: Option<i64>,
    /// Whether the scheduler triggered the dispatch.
    pub scheduled: bool,
    /// Failure detail of an aborted run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Append-only record of one dispatch attempt.
///
/// Same-day scheduled records act as the once-per-day send marker. The
/// timestamp is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLogRecord {
    /// Notification family.
    pub kind: NotificationKind,
    /// Relay outcome.
    pub status: DispatchStatus,
    /// Recipient address.
    pub recipient_email: String,
    /// Rendered subject line.
    pub subject: String,
    /// Number of licenses in the message.
    pub license_count: usize,
    /// Identifiers of the licenses in the message.
    pub license_ids: Vec<String>,
    /// Failure message when `status` is failed.
    pub error_message: Option<String>,
    /// Structured context.
    pub metadata: EmailLogMetadata,
}

impl EmailLogRecord {
    /// Returns whether this record gates scheduled dispatches.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.metadata.scheduled
    }
}
