//! Standalone tasks, optionally tied to a project and an assignee.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::TaskService;
