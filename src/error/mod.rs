pub mod app_error;

pub use app_error::{to_run_aborted, AnalysisError, Result};
