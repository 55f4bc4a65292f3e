pub mod trend_analysis_job;

pub use trend_analysis_job::{AssetOutcome, TrendAnalysisJob};
