//! Once-per-day license expiry notifications.

mod gate;
mod payload;


use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{error, info, warn};

use custodian_core::{AppError, AppResult};
use custodian_domain::{
    ClassifiedLicense, DispatchStatus, EmailLogMetadata, EmailLogRecord,
    LICENSE_NOTIFICATION_MODULE, LicenseRecord, NotificationKind, classify,
};

use crate::Clock;
use crate::notification_ports::{EmailLogRepository, EmailRelay, LicenseRepository};

/// Configuration for license notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Named time zone that defines "today".
    pub time_zone: Tz,
    /// Days ahead of expiry that trigger a warning.
    pub warning_window_days: u32,
    /// Recipient of every notification.
    pub recipient_email: String,
    /// Sender address shown in the message.
    pub from_email: String,
    /// Sender name shown in the message.
    pub from_name: String,
    /// Relay template for warning notifications.
    pub warning_template_id: String,
    /// Relay template for expired notifications.
    pub expired_template_id: String,
}

impl NotificationSettings {
    fn template_id(&self, kind: NotificationKind) -> &str {
        match kind {
            NotificationKind::LicenseWarning => self.warning_template_id.as_str(),
            NotificationKind::LicenseExpired => self.expired_template_id.as_str(),
        }
    }
}

/// Outcome of one dispatch check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Whether the relay accepted a message.
    pub sent: bool,
    /// Number of licenses included in the attempted message.
    pub count: usize,
}

impl DispatchResult {
    fn skipped() -> Self {
        Self {
            sent: false,
            count: 0,
        }
    }
}

/// Application service for license expiry notifications.
#[derive(Clone)]
pub struct NotificationService {
    license_repository: Arc<dyn LicenseRepository>,
    email_log_repository: Arc<dyn EmailLogRepository>,
    email_relay: Arc<dyn EmailRelay>,
    clock: Arc<dyn Clock>,
    settings: NotificationSettings,
}

impl NotificationService {
    /// Creates a notification service from its ports.
    #[must_use]
    pub fn new(
        license_repository: Arc<dyn LicenseRepository>,
        email_log_repository: Arc<dyn EmailLogRepository>,
        email_relay: Arc<dyn EmailRelay>,
        clock: Arc<dyn Clock>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            license_repository,
            email_log_repository,
            email_relay,
            clock,
            settings,
        }
    }

    /// Scheduled entry point for licenses inside the warning window.
    pub async fn send_license_warnings(&self) -> AppResult<DispatchResult> {
        self.run_scheduled(NotificationKind::LicenseWarning).await
    }

    /// Scheduled entry point for expired licenses.
    pub async fn send_expired_license_notices(&self) -> AppResult<DispatchResult> {
        self.run_scheduled(NotificationKind::LicenseExpired).await
    }

    /// Sends one notification of `kind` for `licenses` unless one was already
    /// sent today or nothing matches.
    ///
    /// Relay failures are logged and recorded, never returned. Errors only
    /// come from the gate query.
    pub async fn dispatch_if_due(
        &self,
        kind: NotificationKind,
        licenses: &[LicenseRecord],
    ) -> AppResult<DispatchResult> {
        if self.gate_closed(kind).await? {
            return Ok(DispatchResult::skipped());
        }

        Ok(self.dispatch_matching(kind, licenses).await)
    }

    async fn run_scheduled(&self, kind: NotificationKind) -> AppResult<DispatchResult> {
        info!(kind = kind.as_str(), "starting scheduled license notification check");

        match self.load_and_dispatch(kind).await {
            Ok(result) => Ok(result),
            Err(run_error) => {
                error!(
                    kind = kind.as_str(),
                    error = %run_error,
                    "scheduled license notification check failed"
                );
                self.report_failure(kind, &run_error).await;
                Err(run_error)
            }
        }
    }

    async fn load_and_dispatch(&self, kind: NotificationKind) -> AppResult<DispatchResult> {
        if self.gate_closed(kind).await? {
            return Ok(DispatchResult::skipped());
        }

        let licenses = self.license_repository.list_licenses().await?;
        Ok(self.dispatch_matching(kind, &licenses).await)
    }

    async fn gate_closed(&self, kind: NotificationKind) -> AppResult<bool> {
        let closed = self.already_sent_today(kind).await?;
        if closed {
            info!(kind = kind.as_str(), "license notification already sent today");
        }
        Ok(closed)
    }

    async fn dispatch_matching(
        &self,
        kind: NotificationKind,
        licenses: &[LicenseRecord],
    ) -> DispatchResult {
        let local_now = self.clock.now().with_timezone(&self.settings.time_zone);
        let today = local_now.date_naive();
        let warning_window_days = self.settings.warning_window_days;

        let selected: Vec<ClassifiedLicense<'_>> = licenses
            .iter()
            .map(|license| classify(license, warning_window_days, today))
            .filter(|classified| match kind {
                NotificationKind::LicenseWarning => classified.is_warning,
                NotificationKind::LicenseExpired => classified.is_expired,
            })
            .collect();

        if selected.is_empty() {
            info!(kind = kind.as_str(), "no licenses to notify about");
            return DispatchResult::skipped();
        }

        let message = payload::compose(kind, &selected, &self.settings, &local_now);
        let template_id = self.settings.template_id(kind);
        let (status, error_message) = match self
            .email_relay
            .send_template(template_id, &message.params)
            .await
        {
            Ok(()) => {
                info!(
                    kind = kind.as_str(),
                    template_id,
                    license_count = selected.len(),
                    "license notification sent"
                );
                (DispatchStatus::Sent, None)
            }
            Err(relay_error) => {
                warn!(
                    kind = kind.as_str(),
                    template_id,
                    error = %relay_error,
                    "license notification relay failed"
                );
                (DispatchStatus::Failed, Some(relay_error.to_string()))
            }
        };

        self.append_log(EmailLogRecord {
            kind,
            status,
            recipient_email: self.settings.recipient_email.clone(),
            subject: message.params.subject.clone(),
            license_count: selected.len(),
            license_ids: selected
                .iter()
                .map(|classified| classified.license.id.clone())
                .collect(),
            error_message,
            metadata: EmailLogMetadata {
                module: LICENSE_NOTIFICATION_MODULE.to_owned(),
                template_id: template_id.to_owned(),
                days_threshold: message.days_threshold,
                max_days_expired: message.max_days_expired,
                scheduled: true,
                error: None,
            },
        })
        .await;

        DispatchResult {
            sent: status == DispatchStatus::Sent,
            count: selected.len(),
        }
    }

    async fn report_failure(&self, kind: NotificationKind, run_error: &AppError) {
        let (subject, days_threshold, max_days_expired) = match kind {
            NotificationKind::LicenseWarning => (
                "Erro ao enviar emails de aviso de licenças",
                Some(self.settings.warning_window_days),
                None,
            ),
            NotificationKind::LicenseExpired => {
                ("Erro ao enviar emails de licenças expiradas", None, Some(0))
            }
        };

        self.append_log(EmailLogRecord {
            kind,
            status: DispatchStatus::Failed,
            recipient_email: self.settings.recipient_email.clone(),
            subject: subject.to_owned(),
            license_count: 0,
            license_ids: Vec::new(),
            error_message: Some(run_error.to_string()),
            metadata: EmailLogMetadata {
                module: LICENSE_NOTIFICATION_MODULE.to_owned(),
                template_id: self.settings.template_id(kind).to_owned(),
                days_threshold,
                max_days_expired,
                scheduled: true,
                error: Some(format!("{run_error:?}")),
            },
        })
        .await;
    }

    async fn append_log(&self, record: EmailLogRecord) {
        let kind = record.kind;
        if let Err(log_error) = self.email_log_repository.append_entry(record).await {
            error!(
                kind = kind.as_str(),
                error = %log_error,
                "could not record license notification outcome"
            );
        }
    }
}
