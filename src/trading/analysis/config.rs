use serde::{Deserialize, Serialize};

/// 趋势分类配置
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TrendConfig {
    /// 窗口内最少数据点
    pub min_points: usize,
    /// 涨跌幅绝对值低于该值视为横盘
    pub sideways_threshold: f64,
    /// 涨跌幅绝对值高于该值直接按方向判定
    pub strong_move_threshold: f64,
    /// 置信度 = r_squared * data_points / confidence_scale
    pub confidence_scale: f64,
    /// 是否附加技术指标快照
    pub enable_indicators: bool,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_points: 3,
            sideways_threshold: 1.0,
            strong_move_threshold: 5.0,
            confidence_scale: 10.0,
            enable_indicators: true,
        }
    }
}

/// 拉高出货
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PumpAndDumpConfig {
    /// 窗口长度，前一半为拉升段，后一半为出货段
    pub window: usize,
    /// 拉升幅度阈值（%）
    pub pump_threshold: f64,
    /// 出货跌幅阈值（%，负数）
    pub dump_threshold: f64,
}

impl Default for PumpAndDumpConfig {
    fn default() -> Self {
        Self {
            window: 24,
            pump_threshold: 30.0,
            dump_threshold: -20.0,
        }
    }
}

/// 成交量异常
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct VolumeAnomalyConfig {
    /// 窗口长度，最后一个为放量点，其余为基准
    pub window: usize,
    /// 放量倍数
    pub spike_ratio: f64,
    /// 置信度 = ratio / confidence_scale
    pub confidence_scale: f64,
}

impl Default for VolumeAnomalyConfig {
    fn default() -> Self {
        Self {
            window: 7,
            spike_ratio: 5.0,
            confidence_scale: 10.0,
        }
    }
}

/// 筑底反弹
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BottomedOutConfig {
    pub window: usize,
    /// 第一周跌幅阈值（%，负数）
    pub decline_threshold: f64,
    /// 第二周反弹阈值（%）
    pub recovery_threshold: f64,
    pub confidence_scale: f64,
}

impl Default for BottomedOutConfig {
    fn default() -> Self {
        Self {
            window: 14,
            decline_threshold: -10.0,
            recovery_threshold: 8.0,
            confidence_scale: 50.0,
        }
    }
}

/// 抛物线上涨
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ParabolicRiseConfig {
    pub window: usize,
    /// 逐日涨幅加速的最少次数
    pub min_accelerations: usize,
    /// 逐日涨幅之和阈值（%）
    pub total_rise_threshold: f64,
}

impl Default for ParabolicRiseConfig {
    fn default() -> Self {
        Self {
            window: 10,
            min_accelerations: 3,
            total_rise_threshold: 50.0,
        }
    }
}

/// 恐慌投降式下跌
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CapitulationDropConfig {
    pub window: usize,
    /// 第一周跌幅阈值（%，负数）
    pub downtrend_threshold: f64,
    /// 第二周急跌阈值（%，负数）
    pub drop_threshold: f64,
}

impl Default for CapitulationDropConfig {
    fn default() -> Self {
        Self {
            window: 14,
            downtrend_threshold: -15.0,
            drop_threshold: -25.0,
        }
    }
}

/// 基于趋势分类派生的信号
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TrendSignalConfig {
    pub reversal_min_points: usize,
    pub reversal_confidence: f64,
    pub gradual_min_points: usize,
    pub gradual_confidence: f64,
    /// 平均日涨幅阈值（%）
    pub gradual_min_daily_change: f64,
    /// 日涨幅标准差 / 均值 上限
    pub gradual_max_std_ratio: f64,
    pub macro_min_points: usize,
    pub macro_confidence: f64,
    /// 30 日跌幅阈值（%，负数）
    pub macro_decline_threshold: f64,
}

impl Default for TrendSignalConfig {
    fn default() -> Self {
        Self {
            reversal_min_points: 14,
            reversal_confidence: 0.6,
            gradual_min_points: 14,
            gradual_confidence: 0.6,
            gradual_min_daily_change: 2.0,
            gradual_max_std_ratio: 0.5,
            macro_min_points: 30,
            macro_confidence: 0.7,
            macro_decline_threshold: -15.0,
        }
    }
}

/// 所有信号检测阈值
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct SignalThresholds {
    pub pump_and_dump: PumpAndDumpConfig,
    pub volume_anomaly: VolumeAnomalyConfig,
    pub bottomed_out: BottomedOutConfig,
    pub parabolic_rise: ParabolicRiseConfig,
    pub capitulation_drop: CapitulationDropConfig,
    pub trend_signals: TrendSignalConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let json = r#"{"pump_and_dump": {"pump_threshold": 40.0}}"#;
        let thresholds: SignalThresholds = serde_json::from_str(json).unwrap();
        assert_eq!(thresholds.pump_and_dump.pump_threshold, 40.0);
        assert_eq!(thresholds.pump_and_dump.window, 24);
        assert_eq!(thresholds.volume_anomaly, VolumeAnomalyConfig::default());
    }
}
