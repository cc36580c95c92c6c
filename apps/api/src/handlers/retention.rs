use axum::Json;
use axum::extract::{Extension, State};

use crate::dto::{PurgeAuditLogsRequest, PurgeAuditLogsResponse};
use crate::error::ApiResult;
use crate::middleware::CallerIdentity;
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn purge_audit_logs_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    payload: Option<Json<PurgeAuditLogsRequest>>,
) -> ApiResult<Json<PurgeAuditLogsResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    let result = state
        .retention_service
        .run_manual_purge(caller.0.as_ref(), payload.days_to_keep)
        .await?;

    Ok(Json(result.into()))
}
