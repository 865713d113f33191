//! Projects: status tabs, schedule timeline and collaborators.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/projects` | List (status tab, search, sort, pagination) |
//! | POST | `/api/projects` | Create |
//! | GET | `/api/projects/summary` | Counts per status tab |
//! | GET/PATCH/DELETE | `/api/projects/{id}` | Read, partial update, delete |
//! | GET | `/api/projects/{id}/timeline` | Schedule progress |
//! | GET/POST | `/api/projects/{id}/collaborators` | List / add collaborators |
//! | DELETE | `/api/projects/{id}/collaborators/{profile_id}` | Remove a collaborator |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod timeline;

pub use services::ProjectService;
