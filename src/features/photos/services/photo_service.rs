use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::photos::dtos::{
    extension_for, normalize_tags, CreatePhotoDto, PhotoQueryParams, PhotoResponseDto,
    PhotoSectionDto, PhotoUpload, UpdatePhotoDto, UpdatePhotoTaskDto,
};
use crate::features::photos::grouping::group_by_date;
use crate::features::photos::models::{self, Photo, PhotoTask};
use crate::modules::storage::StorageClient;

const COLUMNS: &str = "id, project_id, url, caption, taken_on, tags, assignee, group_name, tasks,
    storage_key, created_by, created_at, updated_at";

/// $1 project, $2 start, $3 end, $4 tag, $5 assignee, $6 group.
/// A set date bound excludes undated photos.
const LIST_FILTER: &str = "($1::UUID IS NULL OR project_id = $1)
    AND ($2::DATE IS NULL OR (taken_on IS NOT NULL AND taken_on >= $2))
    AND ($3::DATE IS NULL OR (taken_on IS NOT NULL AND taken_on <= $3))
    AND ($4::TEXT IS NULL OR $4 = ANY(tags))
    AND ($5::TEXT IS NULL OR assignee = $5)
    AND ($6::TEXT IS NULL OR group_name = $6)";

/// Service for photo operations
pub struct PhotoService {
    pool: PgPool,
    storage: Arc<StorageClient>,
}

impl PhotoService {
    pub fn new(pool: PgPool, storage: Arc<StorageClient>) -> Self {
        Self { pool, storage }
    }

    fn order_by(params: &PhotoQueryParams) -> String {
        let dir = params.sort.as_sql();
        format!("taken_on {dir} NULLS LAST, created_at {dir}, id {dir}")
    }

    async fn fetch_filtered(
        &self,
        params: &PhotoQueryParams,
        page: Option<(i64, i64)>,
    ) -> Result<Vec<Photo>> {
        let range = params.date_range()?;

        let mut query = format!(
            "SELECT {COLUMNS} FROM photos WHERE {LIST_FILTER} ORDER BY {}",
            Self::order_by(params)
        );
        if page.is_some() {
            query.push_str(" LIMIT $7 OFFSET $8");
        }

        let mut q = sqlx::query_as::<_, Photo>(&query)
            .bind(params.project_id)
            .bind(range.start)
            .bind(range.end)
            .bind(params.tag.as_deref().map(str::trim))
            .bind(params.assignee.as_deref())
            .bind(params.group.as_deref());
        if let Some((limit, offset)) = page {
            q = q.bind(limit).bind(offset);
        }

        q.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to list photos: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Filtered, paginated list ordered by photo date
    pub async fn list(&self, params: &PhotoQueryParams) -> Result<(Vec<Photo>, i64)> {
        let range = params.date_range()?;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM photos WHERE {LIST_FILTER}"))
                .bind(params.project_id)
                .bind(range.start)
                .bind(range.end)
                .bind(params.tag.as_deref().map(str::trim))
                .bind(params.assignee.as_deref())
                .bind(params.group.as_deref())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count photos: {:?}", e);
                    AppError::Database(e)
                })?;

        let page = params.pagination();
        let photos = self
            .fetch_filtered(params, Some((page.limit(), page.offset())))
            .await?;

        Ok((photos, total))
    }

    /// Every matching photo, partitioned into date sections
    pub async fn grouped(&self, params: &PhotoQueryParams) -> Result<Vec<PhotoSectionDto>> {
        let range = params.date_range()?;
        let photos = self.fetch_filtered(params, None).await?;
        let dtos: Vec<PhotoResponseDto> = photos
            .into_iter()
            .filter(|p| range.contains(p.taken_on))
            .map(Into::into)
            .collect();

        Ok(group_by_date(dtos, |p| p.taken_on, params.sort)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Photo> {
        let query = format!("SELECT {COLUMNS} FROM photos WHERE id = $1");
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get photo: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))
    }

    /// Register a photo hosted elsewhere
    pub async fn create(&self, dto: &CreatePhotoDto, created_by: Option<Uuid>) -> Result<Photo> {
        let upload = PhotoUpload {
            project_id: dto.project_id,
            caption: dto.caption.clone(),
            taken_on: dto.taken_on,
            tags: normalize_tags(&dto.tags),
            assignee: dto.assignee.clone(),
            group_name: dto.group_name.clone(),
        };
        self.insert(&dto.url, None, &upload, created_by).await
    }

    /// Store the image, then record it. The object is removed again if the
    /// row cannot be written.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
        upload: &PhotoUpload,
        created_by: Option<Uuid>,
    ) -> Result<Photo> {
        let extension = extension_for(content_type).ok_or_else(|| {
            AppError::BadRequest(format!("File type '{}' is not allowed", content_type))
        })?;

        let paths = self.storage.paths();
        let key = paths.generate_key(upload.project_id, Utc::now().date_naive(), extension);
        let url = paths.public_url(&key);

        self.storage.upload(&key, &data, content_type).await?;

        match self.insert(&url, Some(&key), upload, created_by).await {
            Ok(photo) => {
                tracing::info!("Uploaded photo {} ({} bytes) as {}", photo.id, data.len(), key);
                Ok(photo)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    tracing::warn!("Failed to clean up orphaned object {}: {}", key, cleanup);
                }
                Err(e)
            }
        }
    }

    async fn insert(
        &self,
        url: &str,
        storage_key: Option<&str>,
        upload: &PhotoUpload,
        created_by: Option<Uuid>,
    ) -> Result<Photo> {
        let query = format!(
            "INSERT INTO photos (
                project_id, url, caption, taken_on, tags, assignee, group_name,
                storage_key, created_by
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, (SELECT id FROM profiles WHERE id = $9))
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Photo>(&query)
            .bind(upload.project_id)
            .bind(url)
            .bind(upload.caption.as_deref())
            .bind(upload.taken_on)
            .bind(&upload.tags)
            .bind(upload.assignee.as_deref())
            .bind(upload.group_name.as_deref())
            .bind(storage_key)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create photo: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn update(&self, id: Uuid, dto: &UpdatePhotoDto) -> Result<Photo> {
        let query = format!(
            "UPDATE photos SET
                project_id = COALESCE($2, project_id),
                caption = COALESCE($3, caption),
                taken_on = COALESCE($4, taken_on),
                tags = COALESCE($5, tags),
                assignee = COALESCE($6, assignee),
                group_name = COALESCE($7, group_name),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        let tags = dto.tags.as_ref().map(normalize_tags);

        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .bind(dto.project_id)
            .bind(dto.caption.as_deref())
            .bind(dto.taken_on)
            .bind(tags)
            .bind(dto.assignee.as_deref())
            .bind(dto.group_name.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update photo {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))
    }

    /// Delete the row, then the stored object if this service uploaded it
    pub async fn delete(&self, id: Uuid) -> Result<Uuid> {
        let deleted: Option<(Uuid, Option<String>)> =
            sqlx::query_as("DELETE FROM photos WHERE id = $1 RETURNING id, storage_key")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete photo {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        let (id, storage_key) =
            deleted.ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))?;

        if let Some(key) = storage_key {
            if let Err(e) = self.storage.delete(&key).await {
                tracing::warn!("Photo {} deleted but object {} remains: {}", id, key, e);
            }
        }

        tracing::info!("Deleted photo: {}", id);
        Ok(id)
    }

    // =========================================================================
    // EMBEDDED TASKS
    // =========================================================================

    /// Load the task list, apply `change` and write the list back in one UPDATE
    async fn modify_tasks<T, F>(&self, photo_id: Uuid, change: F) -> Result<(T, Vec<PhotoTask>)>
    where
        F: FnOnce(&mut Vec<PhotoTask>) -> Result<T>,
    {
        let mut tx = self.pool.begin().await?;

        let stored: Option<Json<Vec<PhotoTask>>> =
            sqlx::query_scalar("SELECT tasks FROM photos WHERE id = $1 FOR UPDATE")
                .bind(photo_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Json(mut tasks) =
            stored.ok_or_else(|| AppError::NotFound(format!("Photo {} not found", photo_id)))?;

        let outcome = change(&mut tasks)?;

        sqlx::query("UPDATE photos SET tasks = $2, updated_at = NOW() WHERE id = $1")
            .bind(photo_id)
            .bind(Json(&tasks))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to write tasks for photo {}: {:?}", photo_id, e);
                AppError::Database(e)
            })?;

        tx.commit().await?;
        Ok((outcome, tasks))
    }

    pub async fn add_task(&self, photo_id: Uuid, title: &str) -> Result<PhotoTask> {
        let (task, _) = self
            .modify_tasks(photo_id, |tasks| Ok(models::add_task(tasks, title)))
            .await?;
        Ok(task)
    }

    pub async fn update_task(
        &self,
        photo_id: Uuid,
        task_id: Uuid,
        dto: &UpdatePhotoTaskDto,
    ) -> Result<PhotoTask> {
        let (task, _) = self
            .modify_tasks(photo_id, |tasks| {
                models::update_task(tasks, task_id, dto.title.as_deref(), dto.completed)
                    .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))
            })
            .await?;
        Ok(task)
    }

    /// Returns the remaining tasks
    pub async fn remove_task(&self, photo_id: Uuid, task_id: Uuid) -> Result<Vec<PhotoTask>> {
        let (_, tasks) = self
            .modify_tasks(photo_id, |tasks| {
                if models::remove_task(tasks, task_id) {
                    Ok(())
                } else {
                    Err(AppError::NotFound(format!("Task {} not found", task_id)))
                }
            })
            .await?;
        Ok(tasks)
    }
}
