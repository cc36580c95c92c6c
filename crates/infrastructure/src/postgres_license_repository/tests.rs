use custodian_application::LicenseRepository;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresLicenseRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres license tests: {error}");
    }

    Some(pool)
}

#[tokio::test]
async fn licenses_map_storage_columns_to_records() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let id = format!("lic-{}", uuid::Uuid::new_v4());
    let inserted = sqlx::query(
        r#"
        INSERT INTO licenses (id, nome, uf, status, data_vencimento)
        VALUES ($1, 'Operação Norte', 'CE', NULL, '05-03-2099')
        "#,
    )
    .bind(id.as_str())
    .execute(&pool)
    .await;
    assert!(inserted.is_ok());

    let repository = PostgresLicenseRepository::new(pool.clone());
    let licenses = repository.list_licenses().await.unwrap_or_default();
    let Some(license) = licenses.iter().find(|license| license.id == id) else {
        panic!("inserted license should be listed");
    };

    assert_eq!(license.name, "Operação Norte");
    assert_eq!(license.region_code, "CE");
    assert_eq!(license.status, None);
    assert_eq!(license.expiry_date.as_deref(), Some("05-03-2099"));

    let removed = sqlx::query("DELETE FROM licenses WHERE id = $1")
        .bind(id.as_str())
        .execute(&pool)
        .await;
    assert!(removed.is_ok());
}
