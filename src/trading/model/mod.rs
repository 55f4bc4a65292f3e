pub mod analysis_run;
pub mod price_point;
pub mod signal_event;
pub mod trend_result;

pub use analysis_run::{AnalysisBatch, AnalysisRun, RunStatus};
pub use price_point::{validate_series, Asset, PricePoint};
pub use signal_event::{SignalEvent, SignalType};
pub use trend_result::{Timeframe, TrendMetadata, TrendResult, TrendType};
