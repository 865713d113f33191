//! Project reports (site assessments, inspections, daily logs, ...).
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/reports` | List (project, type, archived) |
//! | POST | `/api/reports` | Create |
//! | GET/PATCH/DELETE | `/api/reports/{id}` | Read, partial update, delete |
//! | PUT | `/api/reports/{id}/archived` | Archive or restore |
//! | GET | `/api/reports/{id}/preview` | Rendered HTML document |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod preview;
pub mod routes;
pub mod services;

pub use services::ReportService;
