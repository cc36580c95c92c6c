use chrono::{DateTime, Utc};
use custodian_core::UserIdentity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable action value written on every purge audit record.
pub const AUDIT_ACTION_DELETE: &str = "delete";

/// Stable module value written on every purge audit record.
pub const AUDIT_MODULE_SYSTEM: &str = "system";

/// Identifier of one stored audit log document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditEntryId(Uuid);

impl AuditEntryId {
    /// Creates a random entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an identifier assigned by the store.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AuditEntryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who triggered a purge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditScope {
    /// Run started by the scheduler.
    System,
    /// Run started on demand by an authenticated operator.
    Manual,
}

impl AuditScope {
    /// Returns a stable storage value for this scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Manual => "manual",
        }
    }

    /// Returns the cleanup type recorded in audit metadata.
    #[must_use]
    pub fn cleanup_type(&self) -> &'static str {
        match self {
            Self::System => "scheduled_cleanup",
            Self::Manual => "manual_cleanup",
        }
    }
}

/// Actor recorded on an audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditActor {
    /// Stable actor identifier.
    pub id: String,
    /// Actor email.
    pub email: String,
    /// Human readable actor name.
    pub display_name: String,
}

impl AuditActor {
    /// Builds the actor used by scheduled runs.
    #[must_use]
    pub fn system(email: impl Into<String>) -> Self {
        Self {
            id: "system".to_owned(),
            email: email.into(),
            display_name: "Automated System".to_owned(),
        }
    }

    /// Builds the actor for an authenticated caller.
    #[must_use]
    pub fn from_identity(identity: &UserIdentity) -> Self {
        Self {
            id: identity.subject().to_owned(),
            email: identity.email().unwrap_or_default().to_owned(),
            display_name: identity.display_name().unwrap_or("Admin").to_owned(),
        }
    }
}

/// Purge details attached to an audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditMetadata {
    /// `scheduled_cleanup` or `manual_cleanup`.
    pub cleanup_type: String,
    /// Number of deleted documents, success records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_deleted: Option<u64>,
    /// Retention window applied, success records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_kept: Option<u32>,
    /// Wall-clock time the run finished, success records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_date: Option<DateTime<Utc>>,
    /// Failure message, failure records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome record appended once per purge run.
///
/// The timestamp is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Run actor.
    pub actor: AuditActor,
    /// Trigger scope.
    pub scope: AuditScope,
    /// Always [`AUDIT_ACTION_DELETE`].
    pub action: String,
    /// Always [`AUDIT_MODULE_SYSTEM`].
    pub module: String,
    /// Human readable summary.
    pub description: String,
    /// Structured purge details.
    pub metadata: AuditMetadata,
}

impl AuditRecord {
    /// Builds the record for a purge run that completed.
    #[must_use]
    pub fn purge_succeeded(
        actor: AuditActor,
        scope: AuditScope,
        records_deleted: u64,
        days_kept: u32,
        cleanup_date: DateTime<Utc>,
    ) -> Self {
        let description = match scope {
            AuditScope::System => "Scheduled audit log cleanup",
            AuditScope::Manual => "Manual audit log cleanup",
        };

        Self {
            actor,
            scope,
            action: AUDIT_ACTION_DELETE.to_owned(),
            module: AUDIT_MODULE_SYSTEM.to_owned(),
            description: description.to_owned(),
            metadata: AuditMetadata {
                cleanup_type: scope.cleanup_type().to_owned(),
                records_deleted: Some(records_deleted),
                days_kept: Some(days_kept),
                cleanup_date: Some(cleanup_date),
                error: None,
            },
        }
    }

    /// Builds the record for a purge run that aborted.
    #[must_use]
    pub fn purge_failed(actor: AuditActor, scope: AuditScope, error: impl Into<String>) -> Self {
        let description = match scope {
            AuditScope::System => "Scheduled audit log cleanup failed",
            AuditScope::Manual => "Manual audit log cleanup failed",
        };

        Self {
            actor,
            scope,
            action: AUDIT_ACTION_DELETE.to_owned(),
            module: AUDIT_MODULE_SYSTEM.to_owned(),
            description: description.to_owned(),
            metadata: AuditMetadata {
                cleanup_type: scope.cleanup_type().to_owned(),
                records_deleted: None,
                days_kept: None,
                cleanup_date: None,
                error: Some(error.into()),
            },
        }
    }
}
