//! Profiles: the single canonical identity table.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/profiles` | List profiles (optional role filter) |
//! | GET | `/api/profiles/me` | Profile of the authenticated caller |
//! | PATCH | `/api/profiles/me` | Update the caller's profile |
//! | GET | `/api/profiles/{id}` | Get a profile by id |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ProfileService;
