use tracing::{debug, warn};

use crate::error::Result;
use crate::trading::analysis::config::TrendConfig;
use crate::trading::indicator::statistics;
use crate::trading::indicator::technical::{self, IndicatorConfig, IndicatorSnapshot};
use crate::trading::model::price_point::prices;
use crate::trading::model::{validate_series, PricePoint, Timeframe, TrendMetadata, TrendResult, TrendType};

/// 趋势分类器
///
/// 对每个周期取最后一个点往前回看的窗口做线性回归，结合涨跌幅给出
/// 上涨 / 下跌 / 横盘 的判断。纯计算，无内部状态。
#[derive(Debug, Clone, Default)]
pub struct TrendClassifier {
    config: TrendConfig,
    indicator_config: IndicatorConfig,
}

impl TrendClassifier {
    pub fn new(config: TrendConfig) -> Self {
        Self {
            config,
            indicator_config: IndicatorConfig::default(),
        }
    }

    pub fn with_indicator_config(mut self, indicator_config: IndicatorConfig) -> Self {
        self.indicator_config = indicator_config;
        self
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// 周期窗口：时间戳晚于 `last.ts - duration` 的所有点
    ///
    /// 以数据的最后一个点为锚，不使用当前时间。24h 周期的小时线取 24 个点，
    /// 7d 周期的日线取 7 个点。
    pub fn window(points: &[PricePoint], timeframe: Timeframe) -> &[PricePoint] {
        let Some(last) = points.last() else {
            return points;
        };
        let cutoff = last.ts.saturating_sub(timeframe.duration_ms());
        let start = points.partition_point(|p| p.ts <= cutoff);
        &points[start..]
    }

    /// 根据涨跌幅和回归斜率判定趋势
    ///
    /// 小幅波动 (< sideways_threshold) 为横盘，大幅波动 (> strong_move_threshold)
    /// 直接按方向判定，中间区间按斜率方向判定。
    pub fn classify_change(&self, price_change_percent: f64, slope: f64) -> TrendType {
        let pct = price_change_percent;
        if pct.abs() < self.config.sideways_threshold {
            TrendType::Sideways
        } else if pct > self.config.strong_move_threshold {
            TrendType::Uptrend
        } else if pct < -self.config.strong_move_threshold {
            TrendType::Downtrend
        } else if slope > 0.0 {
            TrendType::Uptrend
        } else if slope < 0.0 {
            TrendType::Downtrend
        } else {
            TrendType::Sideways
        }
    }

    /// 对一个资产的一个周期做趋势分类
    ///
    /// 数据点不足返回 `Ok(None)`，序列不合法返回 `Validation`。
    pub fn classify(
        &self,
        asset_id: &str,
        points: &[PricePoint],
        timeframe: Timeframe,
    ) -> Result<Option<TrendResult>> {
        validate_series(points)?;

        let window = Self::window(points, timeframe);
        let min_points = self.config.min_points.max(2);
        if window.len() < min_points {
            debug!(
                "{} {} 数据点不足: {} < {}",
                asset_id,
                timeframe,
                window.len(),
                min_points
            );
            return Ok(None);
        }

        let window_prices = prices(window);
        let indexed: Vec<(f64, f64)> = window_prices
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, *p))
            .collect();
        let regression = statistics::linear_regression(&indexed)?;

        let start_price = window_prices[0];
        let end_price = window_prices[window_prices.len() - 1];
        let price_change_percent = statistics::percent_change(start_price, end_price)?;
        let trend_type = self.classify_change(price_change_percent, regression.slope);

        let data_points = window.len();
        let confidence = statistics::clamp_confidence(
            regression.r_squared * data_points as f64 / self.config.confidence_scale,
        );
        let volatility = statistics::volatility(&window_prices)? * 100.0;

        let indicators = if self.config.enable_indicators {
            self.indicator_snapshot(asset_id, points)
        } else {
            None
        };

        debug!(
            "{} {} 趋势: {} 涨跌幅: {:.2}% r2: {:.3} 置信度: {:.3}",
            asset_id, timeframe, trend_type, price_change_percent, regression.r_squared, confidence
        );

        Ok(Some(TrendResult {
            asset_id: asset_id.to_string(),
            timeframe,
            trend_type,
            confidence,
            price_change_percent,
            start_time: window[0].ts,
            end_time: window[data_points - 1].ts,
            metadata: TrendMetadata {
                slope: regression.slope,
                intercept: regression.intercept,
                r_squared: regression.r_squared,
                volatility,
                data_points,
                start_price,
                end_price,
                trend_strength: statistics::trend_strength(&window_prices),
                indicators,
            },
        }))
    }

    // 指标需要比周期窗口更长的历史，用整段序列计算
    fn indicator_snapshot(&self, asset_id: &str, points: &[PricePoint]) -> Option<IndicatorSnapshot> {
        match technical::snapshot(&prices(points), &self.indicator_config) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("{} 技术指标计算失败: {}", asset_id, e);
                None
            }
        }
    }
}
