use async_trait::async_trait;
use custodian_application::{EmailRelay, EmailTemplateParams};
use custodian_core::{AppError, AppResult};
use serde::Serialize;
use tracing::debug;

#[cfg(test)]
mod tests;

/// Connection settings for the templated email relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpEmailRelayConfig {
    /// Full URL of the relay's send endpoint.
    pub endpoint: String,
    /// Relay service identifier.
    pub service_id: String,
    /// Relay account identifier.
    pub user_id: String,
}

#[derive(Serialize)]
struct SendTemplateRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a EmailTemplateParams,
}

/// Relay client that posts template sends as JSON.
///
/// Only an HTTP 200 response counts as accepted.
#[derive(Clone)]
pub struct HttpEmailRelay {
    http_client: reqwest::Client,
    config: HttpEmailRelayConfig,
}

impl HttpEmailRelay {
    /// Creates a relay client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: HttpEmailRelayConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

#[async_trait]
impl EmailRelay for HttpEmailRelay {
    async fn send_template(
        &self,
        template_id: &str,
        params: &EmailTemplateParams,
    ) -> AppResult<()> {
        let request = SendTemplateRequest {
            service_id: self.config.service_id.as_str(),
            template_id,
            user_id: self.config.user_id.as_str(),
            template_params: params,
        };

        let response = self
            .http_client
            .post(self.config.endpoint.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("email relay transport error: {error}"))
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            return Err(AppError::Internal(format!(
                "email relay rejected template '{template_id}' with status {status}: {body}"
            )));
        }

        debug!(template_id, to = %params.to_email, "email relay accepted message");
        Ok(())
    }
}
