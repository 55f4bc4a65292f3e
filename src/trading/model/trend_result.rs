use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::trading::indicator::technical::IndicatorSnapshot;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// 分析时间周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "7d")]
    D7,
    #[serde(rename = "14d")]
    D14,
    #[serde(rename = "30d")]
    D30,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::H1,
        Timeframe::H24,
        Timeframe::D7,
        Timeframe::D14,
        Timeframe::D30,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::H1 => "1h",
            Timeframe::H24 => "24h",
            Timeframe::D7 => "7d",
            Timeframe::D14 => "14d",
            Timeframe::D30 => "30d",
        }
    }

    /// 回看时长（毫秒）
    pub fn duration_ms(&self) -> i64 {
        match self {
            Timeframe::H1 => HOUR_MS,
            Timeframe::H24 => DAY_MS,
            Timeframe::D7 => 7 * DAY_MS,
            Timeframe::D14 => 14 * DAY_MS,
            Timeframe::D30 => 30 * DAY_MS,
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1h" => Ok(Timeframe::H1),
            "24h" => Ok(Timeframe::H24),
            "7d" => Ok(Timeframe::D7),
            "14d" => Ok(Timeframe::D14),
            "30d" => Ok(Timeframe::D30),
            _ => Err(format!("Unknown timeframe: {}", s)),
        }
    }
}

/// 趋势类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendType {
    Uptrend,
    Downtrend,
    Sideways,
}

impl TrendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendType::Uptrend => "uptrend",
            TrendType::Downtrend => "downtrend",
            TrendType::Sideways => "sideways",
        }
    }
}

impl Display for TrendType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 趋势分析附加信息
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrendMetadata {
    /// 回归斜率（每个数据点的价格变化）
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// 变异系数（百分比）
    pub volatility: f64,
    pub data_points: usize,
    pub start_price: f64,
    pub end_price: f64,
    /// 逐点涨跌幅的一致性强度 (0-1)
    pub trend_strength: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSnapshot>,
}

/// 单个资产单个周期的趋势分析结果
///
/// 唯一键为 (asset_id, timeframe, start_time)，同一窗口重复计算不会产生新的逻辑记录。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub asset_id: String,
    pub timeframe: Timeframe,
    pub trend_type: TrendType,
    /// 置信度 (0.0 - 1.0)
    pub confidence: f64,
    pub price_change_percent: f64,
    pub start_time: i64,
    pub end_time: i64,
    pub metadata: TrendMetadata,
}

impl TrendResult {
    pub fn natural_key(&self) -> (String, Timeframe, i64) {
        (self.asset_id.clone(), self.timeframe, self.start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_round_trip_labels() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
        assert!("4H".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_timeframe_serde_label() {
        let json = serde_json::to_string(&Timeframe::D7).unwrap();
        assert_eq!(json, "\"7d\"");
        let tf: Timeframe = serde_json::from_str("\"24h\"").unwrap();
        assert_eq!(tf, Timeframe::H24);
    }

    #[test]
    fn test_timeframe_duration() {
        assert_eq!(Timeframe::H24.duration_ms(), 86_400_000);
        assert_eq!(Timeframe::D14.duration_ms(), 14 * Timeframe::H24.duration_ms());
    }

    #[test]
    fn test_trend_type_serde() {
        assert_eq!(serde_json::to_string(&TrendType::Sideways).unwrap(), "\"sideways\"");
    }
}
