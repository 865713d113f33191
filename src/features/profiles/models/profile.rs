use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for `profiles`
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of copying legacy `users` rows into `profiles`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyMigrationSummary {
    pub legacy_table_found: bool,
    pub copied: u64,
    pub skipped: u64,
}
