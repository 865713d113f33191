use serde::Serialize;
use serde_json::Value;

use crate::features::projects::models::Project;
use crate::features::reports::models::Report;
use crate::shared::templates::{self, TemplateError};

const TEMPLATE: &str = "reports/preview.html.jinja";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    pub label: String,
    pub value: String,
}

/// One heading in the rendered report, built from a top-level content key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSection {
    pub heading: String,
    pub text: Option<String>,
    pub items: Vec<String>,
    pub rows: Vec<PreviewRow>,
}

#[derive(Debug, Serialize)]
struct ProjectContext<'a> {
    name: &'a str,
    location: Option<String>,
    contact: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportContext<'a> {
    title: &'a str,
    type_label: &'static str,
    generated_on: String,
    archived: bool,
}

#[derive(Debug, Serialize)]
struct PreviewContext<'a> {
    project: ProjectContext<'a>,
    report: ReportContext<'a>,
    sections: Vec<PreviewSection>,
}

/// `"safety_issues"` -> `"Safety Issues"`
pub fn humanize_key(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flatten a scalar, or a small object/array, into one line of text
fn inline_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(inline_value).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", humanize_key(k), inline_value(v)))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// Turn report content into display sections in alphabetical key order.
///
/// Scalars become a paragraph, arrays a bullet list and objects a
/// label/value table. Non-object content yields a single "Content" section.
pub fn preview_sections(content: &Value) -> Vec<PreviewSection> {
    let Value::Object(map) = content else {
        if content.is_null() {
            return Vec::new();
        }
        return vec![PreviewSection {
            heading: "Content".to_string(),
            text: Some(inline_value(content)),
            items: Vec::new(),
            rows: Vec::new(),
        }];
    };

    map.iter()
        .map(|(key, value)| {
            let mut section = PreviewSection {
                heading: humanize_key(key),
                text: None,
                items: Vec::new(),
                rows: Vec::new(),
            };
            match value {
                Value::Array(items) => {
                    section.items = items.iter().map(inline_value).collect();
                }
                Value::Object(fields) => {
                    section.rows = fields
                        .iter()
                        .map(|(k, v)| PreviewRow {
                            label: humanize_key(k),
                            value: inline_value(v),
                        })
                        .collect();
                }
                other => section.text = Some(inline_value(other)),
            }
            section
        })
        .collect()
}

fn project_location(project: &Project) -> Option<String> {
    let parts: Vec<&str> = [
        project.address.as_deref(),
        project.city.as_deref(),
        project.state.as_deref(),
        project.zip_code.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

fn project_contact(project: &Project) -> Option<String> {
    let parts: Vec<&str> = [
        project.contact_name.as_deref(),
        project.contact_email.as_deref(),
        project.contact_phone.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.trim().is_empty())
    .collect();

    (!parts.is_empty()).then(|| parts.join(" / "))
}

/// Render a report as a standalone HTML document
pub fn render_preview(report: &Report, project: &Project) -> Result<String, TemplateError> {
    let ctx = PreviewContext {
        project: ProjectContext {
            name: &project.name,
            location: project_location(project),
            contact: project_contact(project),
        },
        report: ReportContext {
            title: &report.title,
            type_label: report.report_type.label(),
            generated_on: report.generated_at.format("%B %-d, %Y").to_string(),
            archived: report.archived,
        },
        sections: preview_sections(&report.content),
    };

    templates::render(TEMPLATE, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::projects::models::{Priority, ProjectStatus};
    use crate::features::reports::models::ReportType;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn project() -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Harbor View Remodel".to_string(),
            description: None,
            status: ProjectStatus::Active,
            priority: Priority::High,
            address: Some("12 Pier Rd".to_string()),
            city: Some("Oakland".to_string()),
            state: Some("CA".to_string()),
            zip_code: None,
            contact_name: Some("Dana".to_string()),
            contact_email: None,
            contact_phone: Some("555-0100".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn report(content: Value) -> Report {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        Report {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            report_type: ReportType::SafetyInspection,
            title: "Weekly <safety> walk".to_string(),
            content,
            generated_at: at,
            archived: false,
            created_by: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("safety_issues"), "Safety Issues");
        assert_eq!(humanize_key("crew-count"), "Crew Count");
        assert_eq!(humanize_key("notes"), "Notes");
    }

    #[test]
    fn test_sections_by_value_shape() {
        let sections = preview_sections(&json!({
            "summary": "All clear",
            "hazards": ["Loose rail", "Wet floor"],
            "checklist": { "ppe_worn": true, "crew_count": 6 }
        }));
        assert_eq!(sections.len(), 3);

        let summary = sections.iter().find(|s| s.heading == "Summary").unwrap();
        assert_eq!(summary.text.as_deref(), Some("All clear"));

        let hazards = sections.iter().find(|s| s.heading == "Hazards").unwrap();
        assert_eq!(hazards.items, vec!["Loose rail", "Wet floor"]);

        let checklist = sections.iter().find(|s| s.heading == "Checklist").unwrap();
        assert!(checklist.rows.contains(&PreviewRow {
            label: "Ppe Worn".to_string(),
            value: "Yes".to_string(),
        }));
    }

    #[test]
    fn test_sections_follow_alphabetical_key_order() {
        let sections = preview_sections(&json!({
            "weather": "Clear",
            "crew_count": 6,
            "notes": "Pour at 7am"
        }));
        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["Crew Count", "Notes", "Weather"]);
    }

    #[test]
    fn test_null_content_has_no_sections() {
        assert!(preview_sections(&Value::Null).is_empty());
        assert_eq!(preview_sections(&json!("free text"))[0].heading, "Content");
    }

    #[test]
    fn test_render_preview_escapes_and_includes_header() {
        let html = render_preview(&report(json!({ "summary": "Rail <loose>" })), &project()).unwrap();

        assert!(html.contains("Harbor View Remodel"));
        assert!(html.contains("12 Pier Rd, Oakland, CA"));
        assert!(html.contains("Safety Inspection"));
        assert!(html.contains("March 5, 2024"));
        assert!(html.contains("Weekly &lt;safety&gt; walk"));
        assert!(html.contains("Rail &lt;loose&gt;"));
        assert!(!html.contains("<loose>"));
    }
}
