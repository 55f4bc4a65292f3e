//! 趋势分析任务
//!
//! 只做编排：取资产列表，逐个资产拉一次价格快照，跑趋势分类和信号检测，
//! 最后把结果一次性交给存储方。单个资产失败只计数，不影响其他资产。

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, span, warn, Instrument, Level};

use crate::app_config::AnalysisConfig;
use crate::error::{to_run_aborted, AnalysisError, Result};
use crate::time_util::now_millis;
use crate::trading::analysis::{SignalDetectorSet, TrendClassifier};
use crate::trading::model::{validate_series, AnalysisBatch, AnalysisRun, Asset, PricePoint};
use crate::trading::services::{AssetRegistry, PriceHistoryProvider, ResultSink};

/// 单个资产的分析结果
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AssetOutcome {
    pub batch: AnalysisBatch,
    /// 无法计算而跳过的周期或检测器数量
    pub skipped: usize,
    pub error: Option<String>,
}

impl AssetOutcome {
    fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }
}

pub struct TrendAnalysisJob {
    registry: Arc<dyn AssetRegistry>,
    provider: Arc<dyn PriceHistoryProvider>,
    sink: Arc<dyn ResultSink>,
    config: AnalysisConfig,
    classifier: TrendClassifier,
    detectors: SignalDetectorSet,
}

impl TrendAnalysisJob {
    pub fn new(
        registry: Arc<dyn AssetRegistry>,
        provider: Arc<dyn PriceHistoryProvider>,
        sink: Arc<dyn ResultSink>,
        config: AnalysisConfig,
    ) -> Self {
        let classifier = TrendClassifier::new(config.trend).with_indicator_config(config.indicators);
        let mut detectors = SignalDetectorSet::new(&config.signals);
        if config.enable_trend_signals {
            detectors = detectors.with_trend_signals(&config.signals, classifier.clone());
        }
        Self {
            registry,
            provider,
            sink,
            config,
            classifier,
            detectors,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 执行一次完整的分析运行
    ///
    /// 运行本身的失败（资产列表不可用、结果无法写入）体现在返回的
    /// `AnalysisRun.status` 上，不作为错误返回。
    pub async fn run(&self) -> AnalysisRun {
        let span = span!(Level::INFO, "trend_analysis_run");
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> AnalysisRun {
        let mut run = AnalysisRun::start(&self.config.run_type, now_millis());
        info!("🚀 开始趋势分析 run_id: {}", run.id);
        self.record(&run).await;

        let assets = match self.registry.active_assets().await {
            Ok(assets) => assets,
            Err(e) => {
                let err = to_run_aborted(format!("获取资产列表失败: {:#}", e));
                return self.abort(run, err).await;
            }
        };
        info!("📋 待分析资产 {} 个, 周期 {:?}", assets.len(), self.config.timeframes);

        let outcomes = self.analyze_assets(&assets).await;

        let mut batch = AnalysisBatch::default();
        for outcome in outcomes {
            run.skipped_detectors += outcome.skipped;
            match outcome.error {
                Some(_) => run.error_count += 1,
                None => run.assets_processed += 1,
            }
            batch.merge(outcome.batch);
        }
        // 并发模式下资产完成顺序不固定，按唯一键排序保证输出稳定
        batch.trends.sort_by(|a, b| a.natural_key().cmp(&b.natural_key()));
        batch.signals.sort_by(|a, b| a.natural_key().cmp(&b.natural_key()));
        run.signals_detected = batch.signals.len();

        if !batch.is_empty() {
            if let Err(e) = self.sink.save_batch(&batch).await {
                let err = to_run_aborted(format!("保存分析结果失败: {:#}", e));
                return self.abort(run, err).await;
            }
        }
        run.trends_stored = batch.trends.len();

        run.complete(now_millis());
        self.record(&run).await;
        info!(
            "✅ 趋势分析完成 run_id: {} 资产: {} 失败: {} 趋势: {} 信号: {} 跳过: {} 耗时: {}ms",
            run.id,
            run.assets_processed,
            run.error_count,
            run.trends_stored,
            run.signals_detected,
            run.skipped_detectors,
            run.duration_ms
        );
        run
    }

    async fn analyze_assets(&self, assets: &[Asset]) -> Vec<AssetOutcome> {
        if self.config.max_concurrency > 1 {
            return stream::iter(assets)
                .map(|asset| self.analyze_asset(asset))
                .buffer_unordered(self.config.max_concurrency)
                .collect()
                .await;
        }
        let mut outcomes = Vec::with_capacity(assets.len());
        for asset in assets {
            outcomes.push(self.analyze_asset(asset).await);
        }
        outcomes
    }

    async fn analyze_asset(&self, asset: &Asset) -> AssetOutcome {
        let points = match self.provider.price_history(asset).await {
            Ok(points) => points,
            Err(e) => {
                warn!("⚠️ 获取 {} 价格历史失败: {:#}", asset.id, e);
                return AssetOutcome::failed(format!("获取价格历史失败: {:#}", e));
            }
        };
        match self.analyze_series(&asset.id, &points) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("⚠️ 资产 {} 分析失败: {}", asset.id, e);
                AssetOutcome::failed(e.to_string())
            }
        }
    }

    /// 对一个资产的价格快照做全部分析，纯计算
    pub fn analyze_series(&self, asset_id: &str, points: &[PricePoint]) -> Result<AssetOutcome> {
        if let Some(other) = points.iter().find(|p| p.asset_id != asset_id) {
            return Err(AnalysisError::validation(format!(
                "价格序列属于 {}, 期望 {}",
                other.asset_id, asset_id
            )));
        }
        validate_series(points)?;

        let mut outcome = AssetOutcome::default();
        for timeframe in &self.config.timeframes {
            match self.classifier.classify(asset_id, points, *timeframe) {
                Ok(Some(trend)) => outcome.batch.trends.push(trend),
                Ok(None) => {}
                Err(e) if e.is_no_result() => {
                    debug!("{} {} 趋势跳过: {}", asset_id, timeframe, e);
                    outcome.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let detection = self.detectors.detect_all(asset_id, points)?;
        outcome.skipped += detection.skipped;
        outcome.batch.signals = detection.events;

        debug!(
            "{} 分析完成: {} 个数据点, {} 个趋势, {} 个信号",
            asset_id,
            points.len(),
            outcome.batch.trends.len(),
            outcome.batch.signals.len()
        );
        Ok(outcome)
    }

    async fn abort(&self, mut run: AnalysisRun, err: AnalysisError) -> AnalysisRun {
        error!("❌ 趋势分析中止 run_id: {} {}", run.id, err);
        run.fail(err.to_string(), now_millis());
        self.record(&run).await;
        run
    }

    async fn record(&self, run: &AnalysisRun) {
        if let Err(e) = self.sink.record_run(run).await {
            warn!("⚠️ 记录运行状态失败 run_id: {} {:#}", run.id, e);
        }
    }
}
