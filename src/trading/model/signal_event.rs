use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::trading::indicator::statistics::clamp_confidence;

/// 信号类型
///
/// 信号之间互不排斥，同一资产一次运行可以触发多个。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    PumpAndDump,
    VolumeAnomaly,
    BottomedOut,
    ParabolicRise,
    CapitulationDrop,
    // 基于趋势分类派生的信号，默认关闭
    BullishReversal,
    BearishReversal,
    GradualUptrend,
    MacroDowntrend,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::PumpAndDump => "pump_and_dump",
            SignalType::VolumeAnomaly => "volume_anomaly",
            SignalType::BottomedOut => "bottomed_out",
            SignalType::ParabolicRise => "parabolic_rise",
            SignalType::CapitulationDrop => "capitulation_drop",
            SignalType::BullishReversal => "bullish_reversal",
            SignalType::BearishReversal => "bearish_reversal",
            SignalType::GradualUptrend => "gradual_uptrend",
            SignalType::MacroDowntrend => "macro_downtrend",
        }
    }
}

impl Display for SignalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SignalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pump_and_dump" => Ok(SignalType::PumpAndDump),
            "volume_anomaly" => Ok(SignalType::VolumeAnomaly),
            "bottomed_out" => Ok(SignalType::BottomedOut),
            "parabolic_rise" => Ok(SignalType::ParabolicRise),
            "capitulation_drop" => Ok(SignalType::CapitulationDrop),
            "bullish_reversal" => Ok(SignalType::BullishReversal),
            "bearish_reversal" => Ok(SignalType::BearishReversal),
            "gradual_uptrend" => Ok(SignalType::GradualUptrend),
            "macro_downtrend" => Ok(SignalType::MacroDowntrend),
            _ => Err(format!("Unknown signal type: {}", s)),
        }
    }
}

/// 信号事件
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub asset_id: String,
    pub signal_type: SignalType,
    /// 检测时间：窗口内最后一个观测点的时间戳
    pub detected_at: i64,
    /// 置信度 (0.0 - 1.0)
    pub confidence: f64,
    pub trigger_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_spike_ratio: Option<f64>,
    pub window_start: i64,
    pub window_end: i64,
    /// 信号证据
    pub metadata: serde_json::Value,
}

impl SignalEvent {
    /// 创建信号事件，置信度统一截断到 [0, 1]
    pub fn new(
        asset_id: &str,
        signal_type: SignalType,
        window: (i64, i64),
        confidence: f64,
        trigger_price: f64,
    ) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            signal_type,
            detected_at: window.1,
            confidence: clamp_confidence(confidence),
            trigger_price,
            volume_spike_ratio: None,
            window_start: window.0,
            window_end: window.1,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_volume_spike_ratio(mut self, ratio: Option<f64>) -> Self {
        self.volume_spike_ratio = ratio;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn natural_key(&self) -> (String, SignalType, i64) {
        (self.asset_id.clone(), self.signal_type, self.window_start)
    }
}
