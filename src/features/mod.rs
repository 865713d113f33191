pub mod auth;
pub mod photos;
pub mod profiles;
pub mod projects;
pub mod reports;
pub mod tasks;
