use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::projects::models::{Priority, Project, ProjectStatus, ProjectStatusTab};
use crate::features::projects::timeline::ProjectTimeline;
use crate::shared::types::{
    contains_pattern, default_page, default_page_size, PaginationQuery, SortDirection,
};

/// Project response, with the timeline computed for the current day
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Absent when either date is missing
    pub timeline: Option<ProjectTimeline>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponseDto {
    pub fn from_project(p: Project, today: NaiveDate) -> Self {
        let timeline = ProjectTimeline::compute(p.start_date, p.end_date, today);
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            status: p.status,
            priority: p.priority,
            address: p.address,
            city: p.city,
            state: p.state,
            zip_code: p.zip_code,
            contact_name: p.contact_name,
            contact_email: p.contact_email,
            contact_phone: p.contact_phone,
            start_date: p.start_date,
            end_date: p.end_date,
            timeline,
            created_by: p.created_by,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<Project> for ProjectResponseDto {
    fn from(p: Project) -> Self {
        Self::from_project(p, Utc::now().date_naive())
    }
}

/// Column the project list is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    StartDate,
}

impl ProjectSortField {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ProjectSortField::CreatedAt => "created_at",
            ProjectSortField::UpdatedAt => "updated_at",
            ProjectSortField::Name => "name",
            ProjectSortField::StartDate => "start_date",
        }
    }
}

/// Query params for listing projects
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ProjectQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Status tab (default: all)
    #[serde(default)]
    pub status: ProjectStatusTab,

    /// Case-insensitive search on name or city
    pub search: Option<String>,

    /// Sort column (default: created_at)
    #[serde(default)]
    pub sort_by: ProjectSortField,

    /// Sort direction (default: desc)
    #[serde(default)]
    pub sort: SortDirection,
}

impl Default for ProjectQueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            status: ProjectStatusTab::All,
            search: None,
            sort_by: ProjectSortField::CreatedAt,
            sort: SortDirection::Desc,
        }
    }
}

impl ProjectQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }

    /// `ILIKE` pattern for the search term, if any
    pub fn search_pattern(&self) -> Option<String> {
        contains_pattern(self.search.as_deref())
    }

    /// ORDER BY clause. Undated projects sort last on `start_date`.
    pub fn order_by(&self) -> String {
        let nulls = match self.sort_by {
            ProjectSortField::StartDate => " NULLS LAST",
            _ => "",
        };
        format!(
            "{} {}{}, id {}",
            self.sort_by.as_sql(),
            self.sort.as_sql(),
            nulls,
            self.sort.as_sql()
        )
    }
}

/// Request DTO for creating a project
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_dates", skip_on_field_errors = false))]
pub struct CreateProjectDto {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "crate::shared::validation::not_blank")
    )]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 128))]
    pub city: Option<String>,

    #[validate(length(max = 128))]
    pub state: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::ZIP_CODE_REGEX",
        message = "Zip code format is invalid"
    ))]
    pub zip_code: Option<String>,

    #[validate(length(max = 128))]
    pub contact_name: Option<String>,

    #[validate(email(message = "Contact email is invalid"))]
    pub contact_email: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Contact phone format is invalid"
    ))]
    pub contact_phone: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Request DTO for a partial project update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_dates", skip_on_field_errors = false))]
pub struct UpdateProjectDto {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "crate::shared::validation::not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 128))]
    pub city: Option<String>,

    #[validate(length(max = 128))]
    pub state: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::ZIP_CODE_REGEX",
        message = "Zip code format is invalid"
    ))]
    pub zip_code: Option<String>,

    #[validate(length(max = 128))]
    pub contact_name: Option<String>,

    #[validate(email(message = "Contact email is invalid"))]
    pub contact_email: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Contact phone format is invalid"
    ))]
    pub contact_phone: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn check_date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::new("date_order")
            .with_message("End date must be on or after the start date".into())),
        _ => Ok(()),
    }
}

fn validate_create_dates(dto: &CreateProjectDto) -> Result<(), ValidationError> {
    check_date_order(dto.start_date, dto.end_date)
}

// Only checked when both dates arrive together; a single date is checked
// against the stored one by the `projects_dates_ordered` constraint.
fn validate_update_dates(dto: &UpdateProjectDto) -> Result<(), ValidationError> {
    check_date_order(dto.start_date, dto.end_date)
}

/// Timeline of a single project
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectTimelineResponseDto {
    pub project_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub timeline: Option<ProjectTimeline>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::DEFAULT_PAGE_SIZE;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_create_requires_name() {
        let dto = CreateProjectDto {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_err());

        let dto = CreateProjectDto {
            name: "Harbor View Remodel".to_string(),
            city: Some("Oakland".to_string()),
            zip_code: Some("94607".to_string()),
            contact_email: Some("pm@example.com".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let dto = CreateProjectDto {
            name: "Roof".to_string(),
            start_date: Some(d(2024, 5, 1)),
            end_date: Some(d(2024, 4, 30)),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.to_string().contains("End date must be on or after"));

        let dto = UpdateProjectDto {
            start_date: Some(d(2024, 5, 1)),
            end_date: Some(d(2024, 5, 1)),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_order_by_uses_whitelisted_columns() {
        let params = ProjectQueryParams {
            sort_by: ProjectSortField::StartDate,
            sort: SortDirection::Asc,
            ..Default::default()
        };
        assert_eq!(params.order_by(), "start_date ASC NULLS LAST, id ASC");
        assert_eq!(
            ProjectQueryParams::default().order_by(),
            "created_at DESC, id DESC"
        );
    }

    #[test]
    fn test_search_pattern_ignores_blank() {
        let mut params = ProjectQueryParams {
            search: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(params.search_pattern().is_none());

        params.search = Some(" oak ".to_string());
        assert_eq!(params.search_pattern().as_deref(), Some("%oak%"));

        params.search = Some("lot_7 100%".to_string());
        assert_eq!(params.search_pattern().as_deref(), Some(r"%lot\_7 100\%%"));
    }

    #[test]
    fn test_huge_page_saturates_offset() {
        let params = ProjectQueryParams {
            page: i64::MAX,
            ..Default::default()
        };
        assert_eq!(params.pagination().offset(), i64::MAX);
        assert_eq!(params.pagination().limit(), DEFAULT_PAGE_SIZE);
    }
}
