use async_trait::async_trait;
use custodian_application::LicenseRepository;
use custodian_core::AppResult;
use custodian_domain::LicenseRecord;
use tokio::sync::RwLock;

/// In-memory license list.
#[derive(Debug, Default)]
pub struct InMemoryLicenseRepository {
    licenses: RwLock<Vec<LicenseRecord>>,
}

impl InMemoryLicenseRepository {
    /// Creates a store holding `licenses`.
    #[must_use]
    pub fn new(licenses: Vec<LicenseRecord>) -> Self {
        Self {
            licenses: RwLock::new(licenses),
        }
    }
}

#[async_trait]
impl LicenseRepository for InMemoryLicenseRepository {
    async fn list_licenses(&self) -> AppResult<Vec<LicenseRecord>> {
        Ok(self.licenses.read().await.clone())
    }
}
