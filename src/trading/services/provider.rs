//! 分析任务依赖的外部协作方接口
//!
//! 资产列表、价格历史、结果存储都通过接口注入，分析核心不持有任何全局客户端。

use anyhow::Result;
use async_trait::async_trait;

use crate::trading::model::{AnalysisBatch, AnalysisRun, Asset, PricePoint};

/// 资产注册表
#[async_trait]
pub trait AssetRegistry: Send + Sync {
    /// 需要分析的活跃资产
    async fn active_assets(&self) -> Result<Vec<Asset>>;
}

/// 价格历史数据源
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// 按时间升序返回资产的价格序列
    async fn price_history(&self, asset: &Asset) -> Result<Vec<PricePoint>>;
}

/// 分析结果存储
///
/// 趋势和信号都带有唯一键，实现方应按唯一键幂等写入。
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// 批量保存一次运行的结果，返回写入条数
    async fn save_batch(&self, batch: &AnalysisBatch) -> Result<usize>;

    /// 记录运行状态
    async fn record_run(&self, run: &AnalysisRun) -> Result<()>;
}
