pub mod analysis;
pub mod env;
pub mod log;

pub use analysis::AnalysisConfig;
