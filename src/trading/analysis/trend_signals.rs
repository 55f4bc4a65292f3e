//! 基于趋势分类派生的信号：趋势反转、温和上涨、宏观下跌

use serde_json::json;

use crate::error::Result;
use crate::trading::analysis::config::TrendSignalConfig;
use crate::trading::analysis::signal_detector::{tail, window_bounds, SignalDetector};
use crate::trading::analysis::trend_classifier::TrendClassifier;
use crate::trading::indicator::statistics::{mean, percent_change, std_dev, step_changes};
use crate::trading::model::price_point::prices;
use crate::trading::model::{PricePoint, SignalEvent, SignalType, Timeframe, TrendType};

/// 7 日趋势与 30 日趋势方向相反
pub struct TrendReversalDetector {
    config: TrendSignalConfig,
    classifier: TrendClassifier,
}

impl TrendReversalDetector {
    pub fn new(config: TrendSignalConfig, classifier: TrendClassifier) -> Self {
        Self { config, classifier }
    }
}

impl SignalDetector for TrendReversalDetector {
    fn name(&self) -> &'static str {
        "trend_reversal"
    }

    fn detect(&self, asset_id: &str, points: &[PricePoint]) -> Result<Option<SignalEvent>> {
        if points.len() < self.config.reversal_min_points {
            return Ok(None);
        }
        let short_term = self.classifier.classify(asset_id, points, Timeframe::D7)?;
        let long_term = self.classifier.classify(asset_id, points, Timeframe::D30)?;
        let (Some(short_term), Some(long_term)) = (short_term, long_term) else {
            return Ok(None);
        };

        let confident = short_term.confidence > self.config.reversal_confidence;
        let signal_type = match (long_term.trend_type, short_term.trend_type) {
            (TrendType::Downtrend, TrendType::Uptrend | TrendType::Sideways) if confident => {
                SignalType::BullishReversal
            }
            (TrendType::Uptrend, TrendType::Downtrend) if confident => SignalType::BearishReversal,
            _ => return Ok(None),
        };

        let trigger_price = points[points.len() - 1].price;
        let event = SignalEvent::new(
            asset_id,
            signal_type,
            (long_term.start_time, long_term.end_time),
            (short_term.confidence + long_term.confidence) / 2.0,
            trigger_price,
        )
        .with_metadata(json!({
            "short_term_trend": short_term.trend_type,
            "long_term_trend": long_term.trend_type,
            "short_term_confidence": short_term.confidence,
            "long_term_confidence": long_term.confidence,
        }));
        Ok(Some(event))
    }
}

/// 7 日上涨且逐日涨幅稳定，区别于抛物线上涨
pub struct GradualUptrendDetector {
    config: TrendSignalConfig,
    classifier: TrendClassifier,
}

impl GradualUptrendDetector {
    pub fn new(config: TrendSignalConfig, classifier: TrendClassifier) -> Self {
        Self { config, classifier }
    }
}

impl SignalDetector for GradualUptrendDetector {
    fn name(&self) -> &'static str {
        SignalType::GradualUptrend.as_str()
    }

    fn detect(&self, asset_id: &str, points: &[PricePoint]) -> Result<Option<SignalEvent>> {
        let Some(window) = tail(points, self.config.gradual_min_points) else {
            return Ok(None);
        };
        let Some(trend) = self.classifier.classify(asset_id, points, Timeframe::D7)? else {
            return Ok(None);
        };
        if trend.trend_type != TrendType::Uptrend {
            return Ok(None);
        }

        let changes = step_changes(&prices(window))?;
        if changes.is_empty() {
            return Ok(None);
        }
        let avg_change = mean(&changes)?;
        let change_std = std_dev(&changes)?;
        if !(avg_change > self.config.gradual_min_daily_change
            && change_std < avg_change * self.config.gradual_max_std_ratio
            && trend.confidence > self.config.gradual_confidence)
        {
            return Ok(None);
        }

        let trigger_price = window[window.len() - 1].price;
        let event = SignalEvent::new(
            asset_id,
            SignalType::GradualUptrend,
            window_bounds(window),
            trend.confidence,
            trigger_price,
        )
        .with_metadata(json!({
            "avg_daily_change": avg_change,
            "change_volatility": change_std,
            "total_rise_percent": trend.price_change_percent,
        }));
        Ok(Some(event))
    }
}

/// 30 日高置信度下跌且累计跌幅超过 15%
pub struct MacroDowntrendDetector {
    config: TrendSignalConfig,
    classifier: TrendClassifier,
}

impl MacroDowntrendDetector {
    pub fn new(config: TrendSignalConfig, classifier: TrendClassifier) -> Self {
        Self { config, classifier }
    }
}

impl SignalDetector for MacroDowntrendDetector {
    fn name(&self) -> &'static str {
        SignalType::MacroDowntrend.as_str()
    }

    fn detect(&self, asset_id: &str, points: &[PricePoint]) -> Result<Option<SignalEvent>> {
        let Some(window) = tail(points, self.config.macro_min_points) else {
            return Ok(None);
        };
        let Some(trend) = self.classifier.classify(asset_id, points, Timeframe::D30)? else {
            return Ok(None);
        };
        if trend.trend_type != TrendType::Downtrend {
            return Ok(None);
        }

        let first = window[0].price;
        let last = window[window.len() - 1].price;
        let total_decline = percent_change(first, last)?;
        if !(total_decline < self.config.macro_decline_threshold
            && trend.confidence > self.config.macro_confidence)
        {
            return Ok(None);
        }

        let duration = window.len();
        let event = SignalEvent::new(
            asset_id,
            SignalType::MacroDowntrend,
            window_bounds(window),
            trend.confidence,
            last,
        )
        .with_metadata(json!({
            "total_decline_percent": total_decline,
            "duration_points": duration,
            "avg_daily_decline": total_decline / duration as f64,
        }));
        Ok(Some(event))
    }
}
