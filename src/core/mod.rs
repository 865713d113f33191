//! Core layer - configuration, database, errors and HTTP plumbing

pub mod config;
pub mod database;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod openapi;
