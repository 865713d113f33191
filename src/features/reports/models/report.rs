use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report category matching the `report_type` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    SiteAssessment,
    Progress,
    BeforeAfter,
    DailyLog,
    SafetyInspection,
    QualityInspection,
    Incident,
    PunchList,
    Completion,
}

impl ReportType {
    pub const ALL: [ReportType; 9] = [
        ReportType::SiteAssessment,
        ReportType::Progress,
        ReportType::BeforeAfter,
        ReportType::DailyLog,
        ReportType::SafetyInspection,
        ReportType::QualityInspection,
        ReportType::Incident,
        ReportType::PunchList,
        ReportType::Completion,
    ];

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            ReportType::SiteAssessment => "Site Assessment",
            ReportType::Progress => "Progress Report",
            ReportType::BeforeAfter => "Before & After",
            ReportType::DailyLog => "Daily Log",
            ReportType::SafetyInspection => "Safety Inspection",
            ReportType::QualityInspection => "Quality Inspection",
            ReportType::Incident => "Incident Report",
            ReportType::PunchList => "Punch List",
            ReportType::Completion => "Completion Report",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportType::SiteAssessment => "site_assessment",
            ReportType::Progress => "progress",
            ReportType::BeforeAfter => "before_after",
            ReportType::DailyLog => "daily_log",
            ReportType::SafetyInspection => "safety_inspection",
            ReportType::QualityInspection => "quality_inspection",
            ReportType::Incident => "incident",
            ReportType::PunchList => "punch_list",
            ReportType::Completion => "completion",
        };
        write!(f, "{}", s)
    }
}

/// Database model for `reports`
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub project_id: Uuid,
    pub report_type: ReportType,
    pub title: String,
    pub content: serde_json::Value,
    pub generated_at: DateTime<Utc>,
    pub archived: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde_name() {
        for report_type in ReportType::ALL {
            let json = serde_json::to_string(&report_type).unwrap();
            assert_eq!(json.trim_matches('"'), report_type.to_string());
            assert!(!report_type.label().is_empty());
        }
    }
}
