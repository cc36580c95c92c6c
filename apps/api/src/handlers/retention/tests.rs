use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Duration, Utc};
use custodian_application::{AuditLogRepository, RetentionService, RetentionSettings};
use custodian_core::{AppError, AppResult};
use custodian_domain::AuditEntryId;
use custodian_infrastructure::{InMemoryAuditLogRepository, SystemClock};
use serde_json::Value;
use tower::ServiceExt;

use crate::api_router::build_router;
use crate::middleware::{ACTOR_EMAIL_HEADER, ACTOR_ID_HEADER, ACTOR_NAME_HEADER};
use crate::state::AppState;

const SECRET: &str = "test-shared-secret";
const PURGE_PATH: &str = "/api/retention/audit-logs/purge";

struct UnavailableAuditLog;

#[async_trait]
impl AuditLogRepository for UnavailableAuditLog {
    async fn find_entries_older_than(
        &self,
        _cutoff: DateTime<Utc>,
        _limit: usize,
    ) -> AppResult<Vec<AuditEntryId>> {
        Err(AppError::Internal("audit store unavailable".to_owned()))
    }

    async fn delete_entries(&self, _entry_ids: &[AuditEntryId]) -> AppResult<()> {
        Err(AppError::Internal("audit store unavailable".to_owned()))
    }
}

fn router_with(
    audit_log: Arc<dyn AuditLogRepository>,
    store: Arc<InMemoryAuditLogRepository>,
) -> Router {
    build_router(AppState {
        retention_service: RetentionService::new(
            audit_log,
            store,
            Arc::new(SystemClock),
            RetentionSettings::default(),
        ),
        shared_secret: Arc::from(SECRET),
    })
}

fn store() -> Arc<InMemoryAuditLogRepository> {
    Arc::new(InMemoryAuditLogRepository::new(Arc::new(SystemClock)))
}

fn purge_request(authorized: bool, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(PURGE_PATH)
        .header(header::CONTENT_TYPE, "application/json");
    if authorized {
        builder = builder
            .header(header::AUTHORIZATION, format!("Bearer {SECRET}"))
            .header(ACTOR_ID_HEADER, "operator-1")
            .header(ACTOR_EMAIL_HEADER, "operator@example.com")
            .header(ACTOR_NAME_HEADER, "Operator");
    }

    match builder.body(Body::from(body.to_owned())) {
        Ok(request) => request,
        Err(error) => panic!("failed to build request: {error}"),
    }
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = match router.oneshot(request).await {
        Ok(response) => response,
        Err(error) => panic!("router failed: {error}"),
    };
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn purge_without_verified_caller_is_unauthorized_and_writes_nothing() {
    let store = store();
    store.seed_entry(Utc::now() - Duration::days(400)).await;
    let router = router_with(store.clone(), store.clone());

    let (status, body) = send(router, purge_request(false, "{}")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("unauthenticated"))
    );
    assert_eq!(store.entries().await.len(), 1);
    assert!(store.records().await.is_empty());
}

#[tokio::test]
async fn purge_with_wrong_secret_is_unauthorized() {
    let store = store();
    let router = router_with(store.clone(), store.clone());

    let mut request = purge_request(false, "{}");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_static("Bearer not-the-secret"),
    );
    request.headers_mut().insert(
        ACTOR_ID_HEADER,
        header::HeaderValue::from_static("operator-1"),
    );

    let (status, _) = send(router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn purge_applies_requested_window_and_reports_counts() {
    let store = store();
    store.seed_entry(Utc::now() - Duration::days(10)).await;
    store.seed_entry(Utc::now() - Duration::days(1)).await;
    let router = router_with(store.clone(), store.clone());

    let (status, body) = send(router, purge_request(true, r#"{"daysToKeep":5}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["deletedCount"], 1);
    assert_eq!(body["daysKept"], 5);

    let records = store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actor.id, "operator-1");
    assert_eq!(records[0].actor.display_name, "Operator");
}

#[tokio::test]
async fn zero_or_missing_window_falls_back_to_default() {
    let store = store();
    let router = router_with(store.clone(), store.clone());
    let (_, zero) = send(router, purge_request(true, r#"{"daysToKeep":0}"#)).await;
    assert_eq!(zero["daysKept"], 365);

    let router = router_with(store.clone(), store.clone());
    let (status, missing) = send(router, purge_request(true, "{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(missing["daysKept"], 365);
    assert_eq!(missing["deletedCount"], 0);
}

#[tokio::test]
async fn store_failure_surfaces_as_internal_error_with_cleanup_message() {
    let store = store();
    let router = router_with(Arc::new(UnavailableAuditLog), store.clone());

    let (status, body) = send(router, purge_request(true, r#"{"daysToKeep":30}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("cleanup failed"))
    );
    let records = store.records().await;
    assert_eq!(records.len(), 1);
    assert!(records[0].metadata.error.is_some());
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let store = store();
    let router = router_with(store.clone(), store);

    let request = match Request::builder().uri("/health").body(Body::empty()) {
        Ok(request) => request,
        Err(error) => panic!("failed to build request: {error}"),
    };
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

fn bodyless_purge_request(authorized: bool) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(PURGE_PATH);
    if authorized {
        builder = builder
            .header(header::AUTHORIZATION, format!("Bearer {SECRET}"))
            .header(ACTOR_ID_HEADER, "operator-1");
    }

    match builder.body(Body::empty()) {
        Ok(request) => request,
        Err(error) => panic!("failed to build request: {error}"),
    }
}

#[tokio::test]
async fn bodyless_purge_without_caller_is_unauthorized() {
    let store = store();
    let router = router_with(store.clone(), store.clone());

    let (status, body) = send(router, bodyless_purge_request(false)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("unauthenticated"))
    );
    assert!(store.records().await.is_empty());
}

#[tokio::test]
async fn bodyless_purge_uses_default_window() {
    let store = store();
    store.seed_entry(Utc::now() - Duration::days(400)).await;
    store.seed_entry(Utc::now() - Duration::days(30)).await;
    let router = router_with(store.clone(), store.clone());

    let (status, body) = send(router, bodyless_purge_request(true)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["deletedCount"], 1);
    assert_eq!(body["daysKept"], 365);
}
