mod collaborator_dto;
mod project_dto;

pub use collaborator_dto::*;
pub use project_dto::*;
