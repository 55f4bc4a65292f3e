//! # crypto_trend
//!
//! 加密货币价格序列的趋势分类与信号检测引擎

use anyhow::Result;
use dotenv::dotenv;

pub mod app_config;
pub mod error;
pub mod time_util;
pub mod trading;

pub use app_config::log::LogGuards;
pub use app_config::AnalysisConfig;
pub use error::{AnalysisError, Result as AnalysisResult};
pub use trading::task::TrendAnalysisJob;

/// 应用初始化：加载 .env 并设置日志
///
/// 返回的句柄需要在进程结束前一直持有。
pub fn app_init() -> Result<Option<LogGuards>> {
    dotenv().ok();
    app_config::log::setup_logging()
}
