//! HTML templates rendered by the service.
//!
//! Templates live in `templates/` and are embedded at compile time, so the
//! binary does not depend on the working directory.

mod engine;

pub use engine::{render, TemplateError};
