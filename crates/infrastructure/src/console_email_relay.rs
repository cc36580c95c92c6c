//! Console email relay for development. Logs rendered templates to tracing output.

use async_trait::async_trait;
use custodian_application::{EmailRelay, EmailTemplateParams};
use custodian_core::AppResult;
use tracing::info;

/// Development relay that logs messages instead of sending them.
#[derive(Clone, Default)]
pub struct ConsoleEmailRelay;

impl ConsoleEmailRelay {
    /// Creates a new console relay.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailRelay for ConsoleEmailRelay {
    async fn send_template(
        &self,
        template_id: &str,
        params: &EmailTemplateParams,
    ) -> AppResult<()> {
        info!(
            template_id,
            to = %params.to_email,
            subject = %params.subject,
            "--- EMAIL (console) ---\nTo: {}\nSubject: {}\n\n{}\n--- END EMAIL ---",
            params.to_email,
            params.subject,
            params.licenses_list
        );

        Ok(())
    }
}
