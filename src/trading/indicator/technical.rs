use serde::{Deserialize, Serialize};
use ta::indicators::{
    BollingerBands, ExponentialMovingAverage, MovingAverageConvergenceDivergence,
    RelativeStrengthIndex, SimpleMovingAverage,
};
use ta::Next;

use crate::error::{AnalysisError, Result};

/// 技术指标参数
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub sma_period: usize,
    pub ema_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_multiplier: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            sma_period: 20,
            ema_period: 20,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_multiplier: 2.0,
        }
    }
}

/// 序列最后一个点上的指标值，数据不足的指标为 None
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct IndicatorSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_lower: Option<f64>,
    /// 布林带宽度 (upper - lower) / middle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_bandwidth: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn is_empty(&self) -> bool {
        *self == IndicatorSnapshot::default()
    }
}

fn ta_err<E: std::fmt::Debug>(err: E) -> AnalysisError {
    AnalysisError::indeterminate(format!("指标参数错误: {:?}", err))
}

/// 喂入整段收盘价，返回最后一根的指标值
pub fn snapshot(closes: &[f64], config: &IndicatorConfig) -> Result<Option<IndicatorSnapshot>> {
    let mut rsi = RelativeStrengthIndex::new(config.rsi_period).map_err(ta_err)?;
    let mut sma = SimpleMovingAverage::new(config.sma_period).map_err(ta_err)?;
    let mut ema = ExponentialMovingAverage::new(config.ema_period).map_err(ta_err)?;
    let mut macd =
        MovingAverageConvergenceDivergence::new(config.macd_fast, config.macd_slow, config.macd_signal)
            .map_err(ta_err)?;
    let mut bb = BollingerBands::new(config.bb_period, config.bb_multiplier).map_err(ta_err)?;

    let mut last = None;
    for &close in closes {
        last = Some((
            rsi.next(close),
            sma.next(close),
            ema.next(close),
            macd.next(close),
            bb.next(close),
        ));
    }
    let Some((rsi_value, sma_value, ema_value, macd_value, bb_value)) = last else {
        return Ok(None);
    };

    // 只保留预热完成后的值
    let len = closes.len();
    let mut result = IndicatorSnapshot::default();
    if len > config.rsi_period {
        result.rsi = Some(rsi_value);
    }
    if len >= config.sma_period {
        result.sma = Some(sma_value);
    }
    if len >= config.ema_period {
        result.ema = Some(ema_value);
    }
    if len >= config.macd_slow + config.macd_signal {
        result.macd = Some(macd_value.macd);
        result.macd_signal = Some(macd_value.signal);
        result.macd_histogram = Some(macd_value.histogram);
    }
    if len >= config.bb_period {
        result.bb_upper = Some(bb_value.upper);
        result.bb_lower = Some(bb_value.lower);
        if bb_value.average != 0.0 {
            result.bb_bandwidth = Some((bb_value.upper - bb_value.lower) / bb_value.average);
        }
    }

    if result.is_empty() {
        return Ok(None);
    }
    Ok(Some(result))
}
