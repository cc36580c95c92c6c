use chrono::DateTime;
use chrono_tz::Tz;

use custodian_domain::{ClassifiedLicense, NotificationKind};

use super::NotificationSettings;
use crate::notification_ports::EmailTemplateParams;

pub(super) struct ComposedNotification {
    pub(super) params: EmailTemplateParams,
    pub(super) days_threshold: Option<u32>,
    pub(super) max_days_expired: Option<i64>,
}

/// Renders the relay parameters for a non-empty selection.
pub(super) fn compose(
    kind: NotificationKind,
    selected: &[ClassifiedLicense<'_>],
    settings: &NotificationSettings,
    local_now: &DateTime<Tz>,
) -> ComposedNotification {
    let count = selected.len();
    let plural = if count > 1 { "s" } else { "" };

    let (subject, lines, days_threshold, max_days_expired) = match kind {
        NotificationKind::LicenseWarning => (
            format!("Aviso: {count} licença{plural} próxima{plural} do vencimento"),
            selected.iter().map(warning_line).collect::<Vec<_>>(),
            Some(settings.warning_window_days),
            None,
        ),
        NotificationKind::LicenseExpired => {
            // Unparseable dates count as zero days overdue.
            let max_days_expired = selected
                .iter()
                .map(|classified| classified.days_overdue())
                .max()
                .unwrap_or(0);
            (
                format!("URGENTE: {count} licença{plural} vencida{plural}"),
                selected.iter().map(expired_line).collect::<Vec<_>>(),
                None,
                Some(max_days_expired),
            )
        }
    };

    ComposedNotification {
        params: EmailTemplateParams {
            from_name: settings.from_name.clone(),
            to_email: settings.recipient_email.clone(),
            from_email: settings.from_email.clone(),
            subject,
            total_count: count.to_string(),
            licenses_list: lines.join("\n"),
            current_date: local_now.format("%d/%m/%Y %H:%M").to_string(),
            max_days_expired: max_days_expired.map(|days| days.to_string()),
        },
        days_threshold,
        max_days_expired,
    }
}

fn warning_line(classified: &ClassifiedLicense<'_>) -> String {
    let status = if classified.remaining_days > 0 {
        format!("Vence em {} dias", classified.remaining_days)
    } else {
        format!("Venceu há {} dias", classified.days_overdue())
    };

    format!(
        "{} - UF: {} ({status})",
        classified.license.name, classified.license.region_code
    )
}

fn expired_line(classified: &ClassifiedLicense<'_>) -> String {
    format!(
        "{} - UF: {} (Expirada há {} dias)",
        classified.license.name,
        classified.license.region_code,
        classified.days_overdue()
    )
}
