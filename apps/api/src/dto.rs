use custodian_application::ManualPurgeResult;
use serde::{Deserialize, Serialize};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming payload for an on-demand audit log purge.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeAuditLogsRequest {
    #[serde(default)]
    pub days_to_keep: Option<u32>,
}

/// Outcome of an on-demand audit log purge.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeAuditLogsResponse {
    pub success: bool,
    pub deleted_count: u64,
    pub days_kept: u32,
}

impl From<ManualPurgeResult> for PurgeAuditLogsResponse {
    fn from(value: ManualPurgeResult) -> Self {
        Self {
            success: value.success,
            deleted_count: value.deleted_count,
            days_kept: value.days_kept,
        }
    }
}
