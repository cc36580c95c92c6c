use std::sync::Arc;

use custodian_application::RetentionService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub retention_service: RetentionService,
    pub shared_secret: Arc<str>,
}
