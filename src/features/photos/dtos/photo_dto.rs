use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::photos::grouping::{DateRange, DateSection};
use crate::features::photos::models::{Photo, PhotoTask};
use crate::shared::types::{default_page, default_page_size, PaginationQuery, SortDirection};

/// Accepted upload MIME types
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
];

/// Maximum upload size in bytes (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoResponseDto {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub url: String,
    pub caption: Option<String>,
    pub taken_on: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub assignee: Option<String>,
    pub group_name: Option<String>,
    pub tasks: Vec<PhotoTask>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Photo> for PhotoResponseDto {
    fn from(p: Photo) -> Self {
        Self {
            id: p.id,
            project_id: p.project_id,
            url: p.url,
            caption: p.caption,
            taken_on: p.taken_on,
            tags: p.tags,
            assignee: p.assignee,
            group_name: p.group_name,
            tasks: p.tasks.0,
            created_by: p.created_by,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Photos taken on one day; `date` is null for the "Undated" section
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoSectionDto {
    pub date: Option<NaiveDate>,
    pub title: String,
    pub count: usize,
    pub photos: Vec<PhotoResponseDto>,
}

impl From<DateSection<PhotoResponseDto>> for PhotoSectionDto {
    fn from(s: DateSection<PhotoResponseDto>) -> Self {
        Self {
            date: s.date,
            title: s.title,
            count: s.items.len(),
            photos: s.items,
        }
    }
}

/// Query params shared by the flat and grouped photo lists
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PhotoQueryParams {
    /// Page number (1-indexed, flat list only)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page (flat list only)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    pub project_id: Option<Uuid>,

    /// Earliest photo date, inclusive
    pub start_date: Option<NaiveDate>,

    /// Latest photo date, inclusive
    pub end_date: Option<NaiveDate>,

    /// Photos carrying this tag
    pub tag: Option<String>,

    pub assignee: Option<String>,

    /// Photo group name
    pub group: Option<String>,

    /// By photo date: desc = newest first (default)
    #[serde(default)]
    pub sort: SortDirection,
}

impl Default for PhotoQueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            project_id: None,
            start_date: None,
            end_date: None,
            tag: None,
            assignee: None,
            group: None,
            sort: SortDirection::Desc,
        }
    }
}

impl PhotoQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }

    pub fn date_range(&self) -> Result<DateRange, AppError> {
        DateRange::new(self.start_date, self.end_date).ok_or_else(|| {
            AppError::BadRequest("end_date must be on or after start_date".to_string())
        })
    }
}

/// Register a photo that is already hosted elsewhere
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePhotoDto {
    pub project_id: Option<Uuid>,

    #[validate(url(message = "url must be a valid URL"))]
    pub url: String,

    #[validate(length(max = 1000, message = "Caption must not exceed 1000 characters"))]
    pub caption: Option<String>,

    pub taken_on: Option<NaiveDate>,

    #[serde(default)]
    #[validate(length(max = 50, message = "At most 50 tags"))]
    pub tags: Vec<String>,

    #[validate(length(max = 128))]
    pub assignee: Option<String>,

    #[validate(length(max = 128))]
    pub group_name: Option<String>,
}

/// Partial photo update. `tags` replaces the whole list when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePhotoDto {
    pub project_id: Option<Uuid>,

    #[validate(length(max = 1000, message = "Caption must not exceed 1000 characters"))]
    pub caption: Option<String>,

    pub taken_on: Option<NaiveDate>,

    #[validate(length(max = 50, message = "At most 50 tags"))]
    pub tags: Option<Vec<String>>,

    #[validate(length(max = 128))]
    pub assignee: Option<String>,

    #[validate(length(max = 128))]
    pub group_name: Option<String>,
}

/// Multipart form for `POST /api/photos/upload`
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotoDto {
    /// The image file
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    pub project_id: Option<Uuid>,
    pub caption: Option<String>,
    /// YYYY-MM-DD
    pub taken_on: Option<NaiveDate>,
    /// Comma-separated
    #[schema(example = "roof,exterior")]
    pub tags: Option<String>,
    pub assignee: Option<String>,
    pub group_name: Option<String>,
}

/// Parsed upload metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoUpload {
    pub project_id: Option<Uuid>,
    pub caption: Option<String>,
    pub taken_on: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub assignee: Option<String>,
    pub group_name: Option<String>,
}

/// Trim, drop empties and duplicates, keep first-seen order
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddPhotoTaskDto {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "crate::shared::validation::not_blank")
    )]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePhotoTaskDto {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "crate::shared::validation::not_blank")
    )]
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(" roof ,exterior,,roof, drywall ".split(','));
        assert_eq!(tags, vec!["roof", "exterior", "drywall"]);
    }

    #[test]
    fn test_mime_types() {
        assert!(is_mime_type_allowed("image/jpeg"));
        assert!(!is_mime_type_allowed("application/pdf"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("text/plain"), None);
    }

    #[test]
    fn test_inverted_query_range_is_bad_request() {
        let params = PhotoQueryParams {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        assert!(matches!(params.date_range(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_create_photo_requires_valid_url() {
        let dto = CreatePhotoDto {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_err());

        let dto = CreatePhotoDto {
            url: "https://cdn.example.com/p/1.jpg".to_string(),
            tags: vec!["roof".to_string()],
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }
}
