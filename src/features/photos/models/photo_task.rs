use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Checklist item attached to a photo, stored inside `photos.tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PhotoTask {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Append a new open task and return it
pub fn add_task(tasks: &mut Vec<PhotoTask>, title: &str) -> PhotoTask {
    let task = PhotoTask {
        id: Uuid::now_v7(),
        title: title.trim().to_string(),
        completed: false,
        created_at: Utc::now(),
    };
    tasks.push(task.clone());
    task
}

/// Change title and/or completion of one task. `None` if the id is unknown.
pub fn update_task(
    tasks: &mut [PhotoTask],
    task_id: Uuid,
    title: Option<&str>,
    completed: Option<bool>,
) -> Option<PhotoTask> {
    let task = tasks.iter_mut().find(|t| t.id == task_id)?;
    if let Some(title) = title {
        task.title = title.trim().to_string();
    }
    if let Some(completed) = completed {
        task.completed = completed;
    }
    Some(task.clone())
}

/// `false` if the id is unknown
pub fn remove_task(tasks: &mut Vec<PhotoTask>, task_id: Uuid) -> bool {
    let before = tasks.len();
    tasks.retain(|t| t.id != task_id);
    tasks.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    #[test]
    fn test_add_update_remove() {
        let mut tasks = Vec::new();
        let title: String = Sentence(2..5).fake();
        let first = add_task(&mut tasks, &format!("  {title} "));
        let second = add_task(&mut tasks, "Patch drywall");

        assert_eq!(tasks.len(), 2);
        assert_eq!(first.title, title);
        assert!(!first.completed);
        assert_ne!(first.id, second.id);

        let updated = update_task(&mut tasks, second.id, None, Some(true)).unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Patch drywall");
        assert_eq!(tasks[1], updated);
        assert!(!tasks[0].completed);

        assert!(remove_task(&mut tasks, first.id));
        assert_eq!(tasks, vec![updated]);
    }

    #[test]
    fn test_unknown_task_id() {
        let mut tasks = Vec::new();
        add_task(&mut tasks, "Paint trim");
        let missing = Uuid::new_v4();

        assert!(update_task(&mut tasks, missing, Some("x"), None).is_none());
        assert!(!remove_task(&mut tasks, missing));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Paint trim");
    }

    #[test]
    fn test_stored_tasks_without_completed_flag_parse() {
        let raw = serde_json::json!([{
            "id": "0190d5a4-6c1f-7b55-9c4e-2b1f4a1e0b01",
            "title": "Check flashing",
            "created_at": "2024-03-05T10:00:00Z"
        }]);
        let tasks: Vec<PhotoTask> = serde_json::from_value(raw).unwrap();
        assert!(!tasks[0].completed);
    }
}
