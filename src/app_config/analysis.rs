use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app_config::env::{env_is_true, env_or_default, env_usize, parse_list};
use crate::trading::analysis::config::{SignalThresholds, TrendConfig};
use crate::trading::indicator::technical::IndicatorConfig;
use crate::trading::model::Timeframe;

/// 趋势分析任务配置
///
/// 优先级：默认值 < JSON 配置文件 < 环境变量
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub run_type: String,
    /// 每个资产要分析的周期
    pub timeframes: Vec<Timeframe>,
    pub trend: TrendConfig,
    pub indicators: IndicatorConfig,
    pub signals: SignalThresholds,
    /// 是否启用趋势反转等派生信号
    pub enable_trend_signals: bool,
    /// 同时分析的资产数，1 为顺序执行
    pub max_concurrency: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            run_type: "trend_analysis".to_string(),
            timeframes: vec![Timeframe::H24, Timeframe::D7],
            trend: TrendConfig::default(),
            indicators: IndicatorConfig::default(),
            signals: SignalThresholds::default(),
            enable_trend_signals: false,
            max_concurrency: 1,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 用环境变量覆盖配置
    pub fn apply_env(mut self) -> Result<Self> {
        let timeframes = env_or_default("TREND_TIMEFRAMES", "");
        if !timeframes.trim().is_empty() {
            self.timeframes = parse_list(&timeframes).map_err(|e| anyhow!("TREND_TIMEFRAMES: {}", e))?;
        }
        self.max_concurrency = env_usize("ANALYSIS_MAX_CONCURRENCY", self.max_concurrency);
        self.enable_trend_signals = env_is_true("ENABLE_TREND_SIGNALS", self.enable_trend_signals);
        self.trend.enable_indicators = env_is_true("ENABLE_INDICATORS", self.trend.enable_indicators);
        self.trend.min_points = env_usize("TREND_MIN_POINTS", self.trend.min_points);
        Ok(self)
    }

    /// 加载配置：可选的配置文件，再叠加环境变量
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.apply_env()?;
        config.validate()?;
        info!(
            "分析配置: 周期 {:?}, 并发 {}, 派生信号 {}, 技术指标 {}",
            config.timeframes.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
            config.max_concurrency,
            config.enable_trend_signals,
            config.trend.enable_indicators
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeframes.is_empty() {
            return Err(anyhow!("至少需要配置一个分析周期"));
        }
        if self.max_concurrency == 0 {
            return Err(anyhow!("max_concurrency 必须大于 0"));
        }
        if self.trend.min_points < 2 {
            return Err(anyhow!("trend.min_points 至少为 2, 当前 {}", self.trend.min_points));
        }
        if self.trend.confidence_scale <= 0.0 {
            return Err(anyhow!("trend.confidence_scale 必须为正"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.timeframes, vec![Timeframe::H24, Timeframe::D7]);
        assert_eq!(config.max_concurrency, 1);
        assert!(!config.enable_trend_signals);
        assert!(config.trend.enable_indicators);
        assert_eq!(config.signals.pump_and_dump.pump_threshold, 30.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "timeframes": ["1h", "30d"],
            "max_concurrency": 4,
            "signals": {"volume_anomaly": {"spike_ratio": 3.0}}
        }"#;
        let config = AnalysisConfig::from_json(json).unwrap();
        assert_eq!(config.timeframes, vec![Timeframe::H1, Timeframe::D30]);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.signals.volume_anomaly.spike_ratio, 3.0);
        assert_eq!(config.signals.volume_anomaly.window, 7);
        assert_eq!(config.trend, TrendConfig::default());
    }

    #[test]
    fn test_from_file() {
        let path = env::temp_dir().join(format!("analysis-config-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{"enable_trend_signals": true}"#).unwrap();
        let config = AnalysisConfig::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(config.enable_trend_signals);
        assert!(AnalysisConfig::from_file(Path::new("/definitely/not/here.json")).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let config = AnalysisConfig {
            timeframes: vec![],
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.trend.min_points = 1;
        assert!(config.validate().is_err());
    }

    // 唯一读写这些环境变量的测试
    #[test]
    fn test_env_overrides() {
        env::set_var("TREND_TIMEFRAMES", "1h,14d");
        env::set_var("ANALYSIS_MAX_CONCURRENCY", "8");
        env::set_var("ENABLE_TREND_SIGNALS", "true");
        env::set_var("ENABLE_INDICATORS", "0");
        env::set_var("TREND_MIN_POINTS", "5");
        let config = AnalysisConfig::default().apply_env().unwrap();

        env::set_var("TREND_TIMEFRAMES", "1h,2w");
        let invalid = AnalysisConfig::default().apply_env();

        for key in [
            "TREND_TIMEFRAMES",
            "ANALYSIS_MAX_CONCURRENCY",
            "ENABLE_TREND_SIGNALS",
            "ENABLE_INDICATORS",
            "TREND_MIN_POINTS",
        ] {
            env::remove_var(key);
        }

        assert_eq!(config.timeframes, vec![Timeframe::H1, Timeframe::D14]);
        assert_eq!(config.max_concurrency, 8);
        assert!(config.enable_trend_signals);
        assert!(!config.trend.enable_indicators);
        assert_eq!(config.trend.min_points, 5);
        assert!(invalid.is_err());
    }
}
