use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use custodian_application::LicenseRepository;
use custodian_core::{AppError, AppResult};
use custodian_domain::LicenseRecord;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed reader for the `licenses` table.
#[derive(Clone)]
pub struct PostgresLicenseRepository {
    pool: PgPool,
}

impl PostgresLicenseRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LicenseRow {
    id: String,
    nome: String,
    uf: String,
    status: Option<String>,
    data_vencimento: Option<String>,
}

impl From<LicenseRow> for LicenseRecord {
    fn from(row: LicenseRow) -> Self {
        Self {
            id: row.id,
            name: row.nome,
            region_code: row.uf,
            status: row.status,
            expiry_date: row.data_vencimento,
        }
    }
}

#[async_trait]
impl LicenseRepository for PostgresLicenseRepository {
    async fn list_licenses(&self) -> AppResult<Vec<LicenseRecord>> {
        let rows = sqlx::query_as::<_, LicenseRow>(
            r#"
            SELECT id, nome, uf, status, data_vencimento
            FROM licenses
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list licenses: {error}")))?;

        Ok(rows.into_iter().map(LicenseRecord::from).collect())
    }
}
