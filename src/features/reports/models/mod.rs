mod report;

pub use report::{Report, ReportType};
