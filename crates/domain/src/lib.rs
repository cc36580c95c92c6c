//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod email_log;
mod license;

pub use audit::{
    AUDIT_ACTION_DELETE, AUDIT_MODULE_SYSTEM, AuditActor, AuditEntryId, AuditMetadata,
    AuditRecord, AuditScope,
};
pub use email_log::{
    DispatchStatus, EmailLogMetadata, EmailLogRecord, LICENSE_NOTIFICATION_MODULE,
    NotificationKind,
};
pub use license::{
    ClassifiedLicense, EXPIRED_LICENSE_STATUS, LicenseRecord, classify, parse_expiry_date,
};
