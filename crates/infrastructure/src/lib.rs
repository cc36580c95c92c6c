//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_email_relay;
mod http_email_relay;
mod in_memory_audit_log_repository;
mod in_memory_email_log_repository;
mod in_memory_license_repository;
mod postgres_audit_log_repository;
mod postgres_email_log_repository;
mod postgres_license_repository;
mod system_clock;

pub use console_email_relay::ConsoleEmailRelay;
pub use http_email_relay::{HttpEmailRelay, HttpEmailRelayConfig};
pub use in_memory_audit_log_repository::{InMemoryAuditLogRepository, StoredAuditEntry};
pub use in_memory_email_log_repository::{InMemoryEmailLogRepository, StoredEmailLog};
pub use in_memory_license_repository::InMemoryLicenseRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_email_log_repository::PostgresEmailLogRepository;
pub use postgres_license_repository::PostgresLicenseRepository;
pub use system_clock::SystemClock;
