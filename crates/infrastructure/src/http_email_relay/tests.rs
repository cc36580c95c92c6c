use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use custodian_application::{EmailRelay, EmailTemplateParams};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{HttpEmailRelay, HttpEmailRelayConfig};

#[derive(Clone)]
struct RelayState {
    status: StatusCode,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn accept(State(state): State<RelayState>, Json(body): Json<Value>) -> StatusCode {
    state.received.lock().await.push(body);
    state.status
}

async fn spawn_relay(status: StatusCode) -> (String, Arc<Mutex<Vec<Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/v1.0/email/send", post(accept))
        .with_state(RelayState {
            status,
            received: received.clone(),
        });

    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind test relay: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("failed to read test relay address: {error}"),
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{address}/api/v1.0/email/send"), received)
}

fn relay(endpoint: String) -> HttpEmailRelay {
    HttpEmailRelay::new(
        reqwest::Client::new(),
        HttpEmailRelayConfig {
            endpoint,
            service_id: "service_custodian".to_owned(),
            user_id: "user_public_key".to_owned(),
        },
    )
}

fn params() -> EmailTemplateParams {
    EmailTemplateParams {
        from_name: "Custodian".to_owned(),
        to_email: "ops@example.com".to_owned(),
        from_email: "noreply@example.com".to_owned(),
        subject: "URGENTE: 1 licença vencida".to_owned(),
        total_count: "1".to_owned(),
        licenses_list: "Licença A - UF: CE (Expirada há 3 dias)".to_owned(),
        current_date: "15/06/2024 10:00".to_owned(),
        max_days_expired: Some("3".to_owned()),
    }
}

#[tokio::test]
async fn ok_response_is_accepted_and_payload_is_wrapped() {
    let (endpoint, received) = spawn_relay(StatusCode::OK).await;

    let result = relay(endpoint)
        .send_template("template_expired", &params())
        .await;
    assert!(result.is_ok());

    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["service_id"], "service_custodian");
    assert_eq!(received[0]["template_id"], "template_expired");
    assert_eq!(received[0]["user_id"], "user_public_key");
    assert_eq!(received[0]["template_params"]["total_count"], "1");
    assert_eq!(received[0]["template_params"]["max_days_expired"], "3");
}

#[tokio::test]
async fn non_200_success_status_is_rejected() {
    let (endpoint, _) = spawn_relay(StatusCode::ACCEPTED).await;

    let result = relay(endpoint)
        .send_template("template_expired", &params())
        .await;

    let Err(error) = result else {
        panic!("202 should not count as accepted");
    };
    assert!(error.to_string().contains("202"));
}

#[tokio::test]
async fn unreachable_relay_is_reported_as_transport_error() {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind unused listener: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("failed to read unused address: {error}"),
    };
    drop(listener);

    let result = relay(format!("http://{address}/send"))
        .send_template("template_warning", &params())
        .await;

    let Err(error) = result else {
        panic!("closed port should fail");
    };
    assert!(error.to_string().contains("transport error"));
}
