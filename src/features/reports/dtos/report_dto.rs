use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::reports::models::{Report, ReportType};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub report_type: ReportType,
    pub report_type_label: String,
    pub title: String,
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
    pub generated_at: DateTime<Utc>,
    pub archived: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            project_id: r.project_id,
            report_type: r.report_type,
            report_type_label: r.report_type.label().to_string(),
            title: r.title,
            content: r.content,
            generated_at: r.generated_at,
            archived: r.archived,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Query params for listing reports
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReportQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    pub project_id: Option<Uuid>,

    pub report_type: Option<ReportType>,

    /// `true` lists archived reports instead of active ones (default: false)
    #[serde(default)]
    pub archived: bool,
}

impl ReportQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

/// Request DTO for creating a report.
///
/// Required fields are optional at the type level so a missing field
/// comes back as a validation message instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    #[validate(required(message = "project_id is required"))]
    pub project_id: Option<Uuid>,

    #[validate(required(message = "report_type is required"))]
    pub report_type: Option<ReportType>,

    #[validate(
        required(message = "title is required"),
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "crate::shared::validation::not_blank")
    )]
    pub title: Option<String>,

    /// Free-form JSON object, shape depends on the report type
    #[validate(custom(function = "json_object"))]
    #[schema(value_type = Option<Object>)]
    pub content: Option<serde_json::Value>,

    /// Defaults to now
    pub generated_at: Option<DateTime<Utc>>,
}

/// Request DTO for a partial report update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReportDto {
    pub report_type: Option<ReportType>,

    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "crate::shared::validation::not_blank")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "json_object"))]
    #[schema(value_type = Option<Object>)]
    pub content: Option<serde_json::Value>,

    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct SetArchivedDto {
    pub archived: bool,
}

fn json_object(value: &serde_json::Value) -> Result<(), ValidationError> {
    if value.is_object() {
        return Ok(());
    }
    let mut err = ValidationError::new("json_object");
    err.message = Some("content must be a JSON object".into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_with_required_fields_is_valid() {
        let dto = CreateReportDto {
            project_id: Some(Uuid::new_v4()),
            report_type: Some(ReportType::DailyLog),
            title: Some("Day 14 log".to_string()),
            content: Some(json!({ "weather": "Clear", "crew_count": 6 })),
            generated_at: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_missing_fields_lists_each_one() {
        let dto: CreateReportDto = serde_json::from_value(json!({ "title": "  " })).unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("project_id"));
        assert!(fields.contains_key("report_type"));
        assert!(fields.contains_key("title"));
    }

    #[test]
    fn test_content_must_be_object() {
        let dto = UpdateReportDto {
            content: Some(json!(["not", "an", "object"])),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_unknown_report_type_is_rejected_at_parse() {
        let parsed: Result<CreateReportDto, _> =
            serde_json::from_value(json!({ "report_type": "weekly_digest" }));
        assert!(parsed.is_err());
    }
}
