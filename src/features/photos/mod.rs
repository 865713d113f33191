//! Site photos: filtering, date grouping, uploads and per-photo tasks.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/photos` | Filtered list by photo date |
//! | GET | `/api/photos/grouped` | Same filters, one section per date |
//! | POST | `/api/photos` | Register an already hosted image |
//! | POST | `/api/photos/upload` | Multipart upload to object storage |
//! | GET/PATCH/DELETE | `/api/photos/{id}` | Read, update, delete (with stored object) |
//! | POST | `/api/photos/{id}/tasks` | Add a task |
//! | PATCH/DELETE | `/api/photos/{id}/tasks/{task_id}` | Update / remove a task |

pub mod dtos;
pub mod grouping;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PhotoService;
