pub mod json_file;
pub mod memory;
pub mod provider;

pub use json_file::{AnalysisReport, PriceHistoryFile};
pub use memory::{InMemoryMarketData, InMemoryResultSink};
pub use provider::{AssetRegistry, PriceHistoryProvider, ResultSink};
