mod collaborator;
mod project;
mod status_tab;

pub use collaborator::Collaborator;
pub use project::{Priority, Project, ProjectStatus};
pub use status_tab::{ProjectStatusCounts, ProjectStatusTab};
