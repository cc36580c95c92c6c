//! Application services and ports.

#![forbid(unsafe_code)]

mod clock;
mod notification_ports;
mod notification_service;
mod retention_ports;
mod retention_service;

pub use clock::Clock;
pub use notification_ports::{
    EmailLogRepository, EmailRelay, EmailTemplateParams, LicenseRepository,
};
pub use notification_service::{DispatchResult, NotificationService, NotificationSettings};
pub use retention_ports::{AuditLogRepository, AuditRepository};
pub use retention_service::{
    AuditRecorder, BatchDeleter, DEFAULT_DAYS_TO_KEEP, MAX_WRITE_BATCH_SIZE, ManualPurgeResult,
    PurgeInterrupted, RetentionService, RetentionSettings,
};
