use tracing::debug;

use crate::error::Result;
use crate::trading::analysis::config::SignalThresholds;
use crate::trading::analysis::detectors::{
    BottomedOutDetector, CapitulationDropDetector, ParabolicRiseDetector, PumpAndDumpDetector,
    VolumeAnomalyDetector,
};
use crate::trading::analysis::trend_classifier::TrendClassifier;
use crate::trading::analysis::trend_signals::{
    GradualUptrendDetector, MacroDowntrendDetector, TrendReversalDetector,
};
use crate::trading::model::{validate_series, PricePoint, SignalEvent};

/// 信号检测器
///
/// 输入为一个资产按时间升序的价格序列，每次最多产生一个信号。
/// 数据点不足返回 `Ok(None)`，无法计算返回 `Indeterminate`。
/// 单个检测器不做序列校验，调用方需先经过 `validate_series`，
/// `SignalDetectorSet::detect_all` 会先校验再检测。
pub trait SignalDetector: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, asset_id: &str, points: &[PricePoint]) -> Result<Option<SignalEvent>>;
}

/// 取序列末尾 n 个点，不足时返回 None
pub fn tail(points: &[PricePoint], n: usize) -> Option<&[PricePoint]> {
    if n == 0 || points.len() < n {
        return None;
    }
    Some(&points[points.len() - n..])
}

/// 窗口首尾时间戳
pub fn window_bounds(window: &[PricePoint]) -> (i64, i64) {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => (first.ts, last.ts),
        _ => (0, 0),
    }
}

pub fn min_price(points: &[PricePoint]) -> f64 {
    points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min)
}

pub fn max_price(points: &[PricePoint]) -> f64 {
    points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max)
}

/// 一个资产跑完全部检测器的结果
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DetectionOutcome {
    pub events: Vec<SignalEvent>,
    /// 因无法计算而跳过的检测器数量
    pub skipped: usize,
}

/// 检测器集合
pub struct SignalDetectorSet {
    detectors: Vec<Box<dyn SignalDetector>>,
}

impl SignalDetectorSet {
    /// 五个基础检测器
    pub fn new(thresholds: &SignalThresholds) -> Self {
        let detectors: Vec<Box<dyn SignalDetector>> = vec![
            Box::new(PumpAndDumpDetector::new(thresholds.pump_and_dump)),
            Box::new(VolumeAnomalyDetector::new(thresholds.volume_anomaly)),
            Box::new(BottomedOutDetector::new(thresholds.bottomed_out)),
            Box::new(ParabolicRiseDetector::new(thresholds.parabolic_rise)),
            Box::new(CapitulationDropDetector::new(thresholds.capitulation_drop)),
        ];
        Self { detectors }
    }

    /// 追加基于趋势分类的信号检测
    pub fn with_trend_signals(mut self, thresholds: &SignalThresholds, classifier: TrendClassifier) -> Self {
        let config = thresholds.trend_signals;
        self.detectors
            .push(Box::new(TrendReversalDetector::new(config, classifier.clone())));
        self.detectors
            .push(Box::new(GradualUptrendDetector::new(config, classifier.clone())));
        self.detectors
            .push(Box::new(MacroDowntrendDetector::new(config, classifier)));
        self
    }

    pub fn push(&mut self, detector: Box<dyn SignalDetector>) {
        self.detectors.push(detector);
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// 依次执行所有检测器
    ///
    /// 序列不合法返回 `Validation`，无法计算的检测器记为跳过，其他错误直接返回。
    pub fn detect_all(&self, asset_id: &str, points: &[PricePoint]) -> Result<DetectionOutcome> {
        validate_series(points)?;
        let mut outcome = DetectionOutcome::default();
        for detector in &self.detectors {
            match detector.detect(asset_id, points) {
                Ok(Some(event)) => {
                    debug!(
                        "{} 检测到信号 {} 置信度: {:.3}",
                        asset_id, event.signal_type, event.confidence
                    );
                    outcome.events.push(event);
                }
                Ok(None) => {}
                Err(e) if e.is_no_result() => {
                    debug!("{} 检测器 {} 跳过: {}", asset_id, detector.name(), e);
                    outcome.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(outcome)
    }
}
