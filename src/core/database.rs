use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Apply every pending migration under `./migrations` exactly once
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))
}

/// A table in the public schema with the planner's row estimate
#[derive(Debug, FromRow)]
pub struct TableInfo {
    pub table_name: String,
    pub estimated_rows: i64,
}

/// List public schema tables, largest first
pub async fn list_tables(pool: &PgPool) -> Result<Vec<TableInfo>, sqlx::Error> {
    sqlx::query_as::<_, TableInfo>(
        r#"
        SELECT
            t.table_name::TEXT AS table_name,
            COALESCE(c.reltuples, 0)::BIGINT AS estimated_rows
        FROM information_schema.tables t
        LEFT JOIN pg_class c ON c.relname = t.table_name
        LEFT JOIN pg_namespace n ON n.oid = c.relnamespace AND n.nspname = t.table_schema
        WHERE t.table_schema = 'public' AND t.table_type = 'BASE TABLE'
        ORDER BY estimated_rows DESC, t.table_name
        "#,
    )
    .fetch_all(pool)
    .await
}
