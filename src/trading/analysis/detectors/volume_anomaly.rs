use serde_json::json;

use crate::error::{AnalysisError, Result};
use crate::trading::analysis::config::VolumeAnomalyConfig;
use crate::trading::analysis::signal_detector::{tail, window_bounds, SignalDetector};
use crate::trading::indicator::statistics::{mean, percent_change};
use crate::trading::model::{PricePoint, SignalEvent, SignalType};

/// 成交量异常：最后一个点的成交量超过前面基准均值的 5 倍
#[derive(Debug, Clone, Default)]
pub struct VolumeAnomalyDetector {
    config: VolumeAnomalyConfig,
}

impl VolumeAnomalyDetector {
    pub fn new(config: VolumeAnomalyConfig) -> Self {
        Self { config }
    }
}

impl SignalDetector for VolumeAnomalyDetector {
    fn name(&self) -> &'static str {
        SignalType::VolumeAnomaly.as_str()
    }

    fn detect(&self, asset_id: &str, points: &[PricePoint]) -> Result<Option<SignalEvent>> {
        if self.config.window < 2 {
            return Ok(None);
        }
        let Some(window) = tail(points, self.config.window) else {
            return Ok(None);
        };
        // 窗口内任何一个点缺成交量都不判断
        let Some(volumes) = window.iter().map(|p| p.volume).collect::<Option<Vec<f64>>>() else {
            return Ok(None);
        };

        let (baseline, spike) = volumes.split_at(volumes.len() - 1);
        let spike_volume = spike[0];
        let avg_volume = mean(baseline)?;
        if avg_volume == 0.0 {
            return Err(AnalysisError::indeterminate(format!(
                "{} 基准成交量均值为 0",
                asset_id
            )));
        }

        let ratio = spike_volume / avg_volume;
        if !(ratio > self.config.spike_ratio) {
            return Ok(None);
        }

        let trigger_price = window[window.len() - 1].price;
        let event = SignalEvent::new(
            asset_id,
            SignalType::VolumeAnomaly,
            window_bounds(window),
            ratio / self.config.confidence_scale,
            trigger_price,
        )
        .with_volume_spike_ratio(Some(ratio))
        .with_metadata(json!({
            "avg_volume": avg_volume,
            "spike_volume": spike_volume,
            "volume_increase_percent": percent_change(avg_volume, spike_volume)?,
        }));
        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn series(volumes: &[Option<f64>]) -> Vec<PricePoint> {
        volumes
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut point = PricePoint::new("doge", i as i64 * 86_400_000, 0.1 + i as f64 * 0.001);
                point.volume = *v;
                point
            })
            .collect()
    }

    fn with_spike(spike: f64) -> Vec<PricePoint> {
        let mut volumes = vec![Some(1000.0); 6];
        volumes.push(Some(spike));
        series(&volumes)
    }

    #[test]
    fn test_volume_spike_detected() {
        let points = with_spike(6000.0);
        let event = VolumeAnomalyDetector::default()
            .detect("doge", &points)
            .unwrap()
            .unwrap();
        assert!(approx_eq!(f64, event.volume_spike_ratio.unwrap(), 6.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, event.confidence, 0.6, epsilon = 1e-12));
        assert_eq!(event.trigger_price, points[6].price);
        assert_eq!(event.metadata["volume_increase_percent"], 500.0);
    }

    #[test]
    fn test_ratio_threshold_is_strict() {
        let detector = VolumeAnomalyDetector::default();
        assert!(detector.detect("doge", &with_spike(5000.0)).unwrap().is_none());
        assert!(detector.detect("doge", &with_spike(5001.0)).unwrap().is_some());
    }

    #[test]
    fn test_missing_volume_no_event() {
        let mut volumes = vec![Some(1000.0); 6];
        volumes[2] = None;
        volumes.push(Some(100_000.0));
        let points = series(&volumes);
        assert!(VolumeAnomalyDetector::default().detect("doge", &points).unwrap().is_none());
    }

    #[test]
    fn test_zero_baseline_indeterminate() {
        let mut volumes = vec![Some(0.0); 6];
        volumes.push(Some(100.0));
        let err = VolumeAnomalyDetector::default()
            .detect("doge", &series(&volumes))
            .unwrap_err();
        assert!(err.is_no_result());
    }

    #[test]
    fn test_extreme_spike_clamped() {
        let event = VolumeAnomalyDetector::default()
            .detect("doge", &with_spike(1e15))
            .unwrap()
            .unwrap();
        assert_eq!(event.confidence, 1.0);
    }

    #[test]
    fn test_insufficient_points() {
        let points = series(&[Some(1.0), Some(1.0), Some(100.0)]);
        assert!(VolumeAnomalyDetector::default().detect("doge", &points).unwrap().is_none());
    }
}
