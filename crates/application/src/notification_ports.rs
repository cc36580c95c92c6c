use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use custodian_core::AppResult;
use custodian_domain::{EmailLogRecord, LicenseRecord, NotificationKind};

/// Repository port for reading tracked licenses.
#[async_trait]
pub trait LicenseRepository: Send + Sync {
    /// Lists every license in the store.
    async fn list_licenses(&self) -> AppResult<Vec<LicenseRecord>>;
}

/// Repository port for email dispatch logs.
#[async_trait]
pub trait EmailLogRepository: Send + Sync {
    /// Returns whether a scheduled entry of `kind` exists with a timestamp in
    /// `[from, until)`.
    async fn has_scheduled_entry_between(
        &self,
        kind: NotificationKind,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Appends an entry stamped with the store's own clock.
    async fn append_entry(&self, record: EmailLogRecord) -> AppResult<()>;
}

/// Parameters rendered by the relay's email templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplateParams {
    /// Sender display name.
    pub from_name: String,
    /// Recipient address.
    pub to_email: String,
    /// Sender address.
    pub from_email: String,
    /// Subject line.
    pub subject: String,
    /// Number of listed licenses.
    pub total_count: String,
    /// One line per license.
    pub licenses_list: String,
    /// Local dispatch time as `DD/MM/YYYY HH:mm`.
    pub current_date: String,
    /// Largest overdue day count, expired notifications only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_days_expired: Option<String>,
}

/// Outbound email relay port.
#[async_trait]
pub trait EmailRelay: Send + Sync {
    /// Submits a templated message.
    ///
    /// Returns an error when the relay does not accept the message.
    async fn send_template(
        &self,
        template_id: &str,
        params: &EmailTemplateParams,
    ) -> AppResult<()>;
}
