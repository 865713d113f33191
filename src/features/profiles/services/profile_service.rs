use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::profiles::dtos::{ProfileQueryParams, UpdateProfileDto};
use crate::features::profiles::models::{LegacyMigrationSummary, Profile};
use crate::shared::constants::ROLE_MEMBER;
use crate::shared::types::contains_pattern;

const COLUMNS: &str = "id, email, full_name, role, phone, avatar_url, created_at, updated_at";

/// Service for profile operations
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List profiles ordered by name
    pub async fn list(&self, params: &ProfileQueryParams) -> Result<Vec<Profile>> {
        let search = contains_pattern(params.search.as_deref());

        let query = format!(
            "SELECT {COLUMNS} FROM profiles
             WHERE ($1::TEXT IS NULL OR role = $1)
               AND ($2::TEXT IS NULL OR full_name ILIKE $2 ESCAPE '\\' OR email ILIKE $2 ESCAPE '\\')
             ORDER BY full_name NULLS LAST, email"
        );

        sqlx::query_as::<_, Profile>(&query)
            .bind(params.role.as_deref())
            .bind(search)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list profiles: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Profile> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get profile: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        Ok(sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Create or refresh the profile row for a hosted auth user.
    ///
    /// An existing name is kept when the incoming one is empty.
    pub async fn upsert_from_auth(
        &self,
        id: Uuid,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<Profile> {
        let query = format!(
            "INSERT INTO profiles (id, email, full_name, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                full_name = COALESCE(EXCLUDED.full_name, profiles.full_name),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );

        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(email)
            .bind(full_name.filter(|n| !n.trim().is_empty()))
            .bind(ROLE_MEMBER)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to upsert profile {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Profile synced from auth: {}", profile.id);
        Ok(profile)
    }

    /// Partial update; `None` fields are left untouched
    pub async fn update(&self, id: Uuid, dto: &UpdateProfileDto) -> Result<Profile> {
        let query = format!(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                avatar_url = COALESCE($4, avatar_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(dto.full_name.as_deref())
            .bind(dto.phone.as_deref())
            .bind(dto.avatar_url.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update profile: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    /// Copy rows from the legacy `users` table into `profiles`.
    ///
    /// Rows whose id or email already exist are skipped. Does nothing when
    /// the legacy table is absent.
    pub async fn migrate_legacy_users(&self) -> Result<LegacyMigrationSummary> {
        let legacy_table_found: bool =
            sqlx::query_scalar("SELECT to_regclass('public.users') IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;

        if !legacy_table_found {
            tracing::info!("No legacy users table found; nothing to migrate");
            return Ok(LegacyMigrationSummary::default());
        }

        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;

        let copied = sqlx::query(
            "INSERT INTO profiles (id, email, full_name, role)
             SELECT u.id, u.email, u.name, COALESCE(NULLIF(u.role, ''), $1)
             FROM users u
             WHERE u.email IS NOT NULL
             ON CONFLICT DO NOTHING",
        )
        .bind(ROLE_MEMBER)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to copy legacy users: {:?}", e);
            AppError::Database(e)
        })?
        .rows_affected();

        tx.commit().await?;

        let summary = LegacyMigrationSummary {
            legacy_table_found: true,
            copied,
            skipped: (total.max(0) as u64).saturating_sub(copied),
        };

        tracing::info!(
            "Legacy user migration finished: copied={}, skipped={}",
            summary.copied,
            summary.skipped
        );

        Ok(summary)
    }
}
