// The handlers module is shared with the binary target
#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{expand_path, load_manifest_from_source};

// Re-export the job and report surface from linkrank-core
pub use linkrank_core::job::{JobOptions, execute_job};
pub use linkrank_core::report::{ReportFormat, gather_report_data, render_report, write_report};
