use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::trading::model::{
    AnalysisBatch, AnalysisRun, Asset, PricePoint, SignalEvent, SignalType, Timeframe, TrendResult,
};
use crate::trading::services::provider::{AssetRegistry, PriceHistoryProvider, ResultSink};

/// 内存中的资产和价格数据
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketData {
    assets: Vec<Asset>,
    prices: HashMap<String, Vec<PricePoint>>,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, asset: Asset, prices: Vec<PricePoint>) -> Self {
        self.prices.insert(asset.id.clone(), prices);
        self.assets.push(asset);
        self
    }

    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    /// 按资产分组追加价格点，保持给定顺序
    pub fn add_prices(&mut self, points: Vec<PricePoint>) {
        for point in points {
            self.prices.entry(point.asset_id.clone()).or_default().push(point);
        }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }
}

#[async_trait]
impl AssetRegistry for InMemoryMarketData {
    async fn active_assets(&self) -> Result<Vec<Asset>> {
        Ok(self.assets.iter().filter(|a| a.is_active).cloned().collect())
    }
}

#[async_trait]
impl PriceHistoryProvider for InMemoryMarketData {
    async fn price_history(&self, asset: &Asset) -> Result<Vec<PricePoint>> {
        Ok(self.prices.get(&asset.id).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
struct SinkState {
    trends: BTreeMap<(String, Timeframe, i64), TrendResult>,
    signals: BTreeMap<(String, SignalType, i64), SignalEvent>,
    runs: Vec<AnalysisRun>,
}

/// 内存结果存储，按唯一键覆盖写入
#[derive(Debug, Default)]
pub struct InMemoryResultSink {
    state: Mutex<SinkState>,
}

impl InMemoryResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn trends(&self) -> Vec<TrendResult> {
        self.state.lock().await.trends.values().cloned().collect()
    }

    pub async fn signals(&self) -> Vec<SignalEvent> {
        self.state.lock().await.signals.values().cloned().collect()
    }

    /// 每次运行的最新状态
    pub async fn runs(&self) -> Vec<AnalysisRun> {
        self.state.lock().await.runs.clone()
    }
}

#[async_trait]
impl ResultSink for InMemoryResultSink {
    async fn save_batch(&self, batch: &AnalysisBatch) -> Result<usize> {
        let mut state = self.state.lock().await;
        for trend in &batch.trends {
            state.trends.insert(trend.natural_key(), trend.clone());
        }
        for signal in &batch.signals {
            state.signals.insert(signal.natural_key(), signal.clone());
        }
        Ok(batch.trends.len() + batch.signals.len())
    }

    async fn record_run(&self, run: &AnalysisRun) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.runs.iter().position(|r| r.id == run.id) {
            Some(index) => state.runs[index] = run.clone(),
            None => state.runs.push(run.clone()),
        }
        Ok(())
    }
}
