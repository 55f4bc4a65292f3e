use serde_json::json;

use crate::error::Result;
use crate::trading::analysis::config::PumpAndDumpConfig;
use crate::trading::analysis::signal_detector::{max_price, min_price, tail, window_bounds, SignalDetector};
use crate::trading::indicator::statistics::{mean, percent_change, split_phases};
use crate::trading::model::{PricePoint, SignalEvent, SignalType};

/// 拉高出货
///
/// 最近 24 个点切成前后两段：前段最低到最高涨幅超过 30%，
/// 后段最低价相对前段最高价跌幅超过 20%。
#[derive(Debug, Clone, Default)]
pub struct PumpAndDumpDetector {
    config: PumpAndDumpConfig,
}

impl PumpAndDumpDetector {
    pub fn new(config: PumpAndDumpConfig) -> Self {
        Self { config }
    }
}

/// 拉升段最大成交量 / 平均成交量，成交量缺失或均值为 0 时为 None
fn volume_spike_ratio(points: &[PricePoint]) -> Option<f64> {
    let volumes: Vec<f64> = points.iter().map(|p| p.volume).collect::<Option<Vec<f64>>>()?;
    let avg = mean(&volumes).ok()?;
    if avg <= 0.0 {
        return None;
    }
    let max = volumes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(max / avg)
}

impl SignalDetector for PumpAndDumpDetector {
    fn name(&self) -> &'static str {
        SignalType::PumpAndDump.as_str()
    }

    fn detect(&self, asset_id: &str, points: &[PricePoint]) -> Result<Option<SignalEvent>> {
        let Some(window) = tail(points, self.config.window) else {
            return Ok(None);
        };
        let Some(phases) = split_phases(window, 2) else {
            return Ok(None);
        };
        let (pump, dump) = (phases[0], phases[1]);

        let pump_start = min_price(pump);
        let pump_peak = max_price(pump);
        let dump_end = min_price(dump);

        let pump_percent = percent_change(pump_start, pump_peak)?;
        let dump_percent = percent_change(pump_peak, dump_end)?;
        if !(pump_percent > self.config.pump_threshold && dump_percent < self.config.dump_threshold) {
            return Ok(None);
        }

        let ratio = volume_spike_ratio(pump);
        let confidence = (pump_percent + dump_percent.abs()) / 100.0;
        let event = SignalEvent::new(
            asset_id,
            SignalType::PumpAndDump,
            window_bounds(window),
            confidence,
            pump_peak,
        )
        .with_volume_spike_ratio(ratio)
        .with_metadata(json!({
            "pump_percent": pump_percent,
            "dump_percent": dump_percent,
            "pump_start_price": pump_start,
            "pump_peak_price": pump_peak,
            "dump_end_price": dump_end,
            "volume_spike_ratio": ratio,
        }));
        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new("pepe", i as i64 * 3_600_000, *p))
            .collect()
    }

    /// 前 12 个点从 start 线性涨到 peak，后 12 个点从 peak 线性跌到 end
    fn pump_then_dump(start: f64, peak: f64, end: f64) -> Vec<f64> {
        let up = (0..12).map(|i| start + (peak - start) * i as f64 / 11.0);
        let down = (0..12).map(|i| peak + (end - peak) * i as f64 / 11.0);
        up.chain(down).collect()
    }

    #[test]
    fn test_pump_and_dump_detected() {
        let points = series(&pump_then_dump(100.0, 135.0, 100.0));
        let event = PumpAndDumpDetector::default()
            .detect("pepe", &points)
            .unwrap()
            .unwrap();
        assert_eq!(event.signal_type, SignalType::PumpAndDump);
        // 35% + 25.93% = 0.609
        assert!(approx_eq!(f64, event.confidence, 0.6092592592592593, epsilon = 1e-9));
        assert_eq!(event.trigger_price, 135.0);
        assert_eq!(event.detected_at, points[23].ts);
        assert_eq!(event.window_start, points[0].ts);
        assert_eq!(event.metadata["pump_peak_price"], 135.0);
        assert!(event.volume_spike_ratio.is_none());
    }

    #[test]
    fn test_pump_threshold_is_strict() {
        let detector = PumpAndDumpDetector::default();
        let exact = series(&pump_then_dump(100.0, 130.0, 100.0));
        assert!(detector.detect("pepe", &exact).unwrap().is_none());

        let above = series(&pump_then_dump(100.0, 130.01, 100.0));
        assert!(detector.detect("pepe", &above).unwrap().is_some());
    }

    #[test]
    fn test_no_dump_no_signal() {
        let points = series(&pump_then_dump(100.0, 150.0, 140.0));
        assert!(PumpAndDumpDetector::default().detect("pepe", &points).unwrap().is_none());
    }

    #[test]
    fn test_insufficient_points() {
        let points = series(&pump_then_dump(100.0, 150.0, 100.0)[..23]);
        assert!(PumpAndDumpDetector::default().detect("pepe", &points).unwrap().is_none());
    }

    #[test]
    fn test_uses_most_recent_window() {
        let mut prices = vec![1.0; 10];
        prices.extend(pump_then_dump(100.0, 135.0, 100.0));
        let points = series(&prices);
        let event = PumpAndDumpDetector::default()
            .detect("pepe", &points)
            .unwrap()
            .unwrap();
        assert_eq!(event.window_start, points[10].ts);
        assert_eq!(event.metadata["pump_start_price"], 100.0);
    }

    #[test]
    fn test_volume_spike_ratio() {
        let mut points = series(&pump_then_dump(100.0, 135.0, 100.0));
        for (i, point) in points.iter_mut().enumerate() {
            point.volume = Some(if i == 11 { 700.0 } else { 100.0 });
        }
        let event = PumpAndDumpDetector::default()
            .detect("pepe", &points)
            .unwrap()
            .unwrap();
        // 平均 (11 * 100 + 700) / 12 = 150
        assert!(approx_eq!(f64, event.volume_spike_ratio.unwrap(), 700.0 / 150.0, epsilon = 1e-12));
    }

    #[test]
    fn test_extreme_pump_confidence_clamped() {
        let points = series(&pump_then_dump(0.0001, 1_000_000.0, 0.0001));
        let event = PumpAndDumpDetector::default()
            .detect("pepe", &points)
            .unwrap()
            .unwrap();
        assert_eq!(event.confidence, 1.0);
    }
}
