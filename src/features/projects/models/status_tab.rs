use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ProjectStatus;

/// Status tab on the project list. `All` shows every project; every
/// other tab shows exactly the projects in that status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatusTab {
    #[default]
    All,
    Active,
    Pending,
    Completed,
    Archived,
}

impl ProjectStatusTab {
    pub const ALL_TABS: [ProjectStatusTab; 5] = [
        ProjectStatusTab::All,
        ProjectStatusTab::Active,
        ProjectStatusTab::Pending,
        ProjectStatusTab::Completed,
        ProjectStatusTab::Archived,
    ];

    /// Status this tab narrows to, `None` for `All`
    pub fn status(self) -> Option<ProjectStatus> {
        match self {
            ProjectStatusTab::All => None,
            ProjectStatusTab::Active => Some(ProjectStatus::Active),
            ProjectStatusTab::Pending => Some(ProjectStatus::Pending),
            ProjectStatusTab::Completed => Some(ProjectStatus::Completed),
            ProjectStatusTab::Archived => Some(ProjectStatus::Archived),
        }
    }

    pub fn matches(self, status: ProjectStatus) -> bool {
        match self.status() {
            None => true,
            Some(wanted) => wanted == status,
        }
    }
}

/// Number of projects visible under each tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectStatusCounts {
    pub all: i64,
    pub active: i64,
    pub pending: i64,
    pub completed: i64,
    pub archived: i64,
}

impl ProjectStatusCounts {
    /// Tally `(status, count)` pairs with the same predicate the list uses
    pub fn tally(rows: &[(ProjectStatus, i64)]) -> Self {
        let mut counts = Self::default();
        for tab in ProjectStatusTab::ALL_TABS {
            let total = rows
                .iter()
                .filter(|(status, _)| tab.matches(*status))
                .map(|(_, n)| n)
                .sum();
            *counts.slot_mut(tab) = total;
        }
        counts
    }

    pub fn get(&self, tab: ProjectStatusTab) -> i64 {
        match tab {
            ProjectStatusTab::All => self.all,
            ProjectStatusTab::Active => self.active,
            ProjectStatusTab::Pending => self.pending,
            ProjectStatusTab::Completed => self.completed,
            ProjectStatusTab::Archived => self.archived,
        }
    }

    fn slot_mut(&mut self, tab: ProjectStatusTab) -> &mut i64 {
        match tab {
            ProjectStatusTab::All => &mut self.all,
            ProjectStatusTab::Active => &mut self.active,
            ProjectStatusTab::Pending => &mut self.pending,
            ProjectStatusTab::Completed => &mut self.completed,
            ProjectStatusTab::Archived => &mut self.archived,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUSES: [ProjectStatus; 4] = [
        ProjectStatus::Active,
        ProjectStatus::Pending,
        ProjectStatus::Completed,
        ProjectStatus::Archived,
    ];

    #[test]
    fn test_tab_matches_exactly_its_status() {
        let sample = [
            ProjectStatus::Active,
            ProjectStatus::Pending,
            ProjectStatus::Active,
            ProjectStatus::Archived,
            ProjectStatus::Completed,
            ProjectStatus::Active,
        ];

        for tab in ProjectStatusTab::ALL_TABS {
            let picked: Vec<_> = sample.iter().filter(|s| tab.matches(**s)).collect();
            match tab.status() {
                None => assert_eq!(picked.len(), sample.len()),
                Some(wanted) => {
                    assert!(picked.iter().all(|s| **s == wanted));
                    let expected = sample.iter().filter(|s| **s == wanted).count();
                    assert_eq!(picked.len(), expected);
                }
            }
        }
    }

    #[test]
    fn test_counts_tally() {
        let rows = [
            (ProjectStatus::Active, 4),
            (ProjectStatus::Completed, 2),
            (ProjectStatus::Archived, 1),
        ];
        let counts = ProjectStatusCounts::tally(&rows);

        assert_eq!(counts.all, 7);
        assert_eq!(counts.active, 4);
        assert_eq!(counts.pending, 0);
        assert_eq!(counts.completed, 2);
        assert_eq!(counts.archived, 1);

        let per_status: i64 = STATUSES
            .iter()
            .map(|s| {
                let tab = ProjectStatusTab::ALL_TABS
                    .into_iter()
                    .find(|t| t.status() == Some(*s))
                    .unwrap();
                counts.get(tab)
            })
            .sum();
        assert_eq!(per_status, counts.get(ProjectStatusTab::All));
    }

    #[test]
    fn test_tab_deserializes_snake_case() {
        let tab: ProjectStatusTab = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(tab, ProjectStatusTab::Completed);
        assert_eq!(ProjectStatusTab::default(), ProjectStatusTab::All);
    }
}
