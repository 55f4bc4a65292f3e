use float_cmp::approx_eq;

use crypto_trend::error::AnalysisError;
use crypto_trend::trading::analysis::config::SignalThresholds;
use crypto_trend::trading::analysis::detectors::{BottomedOutDetector, PumpAndDumpDetector};
use crypto_trend::trading::analysis::{SignalDetector, SignalDetectorSet, TrendClassifier};
use crypto_trend::trading::indicator::statistics::{linear_regression, percent_change};
use crypto_trend::trading::model::{PricePoint, SignalType, Timeframe, TrendType};

const HOUR: i64 = 3_600_000;

fn hourly(prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, p)| PricePoint::new("bitcoin", 1_700_000_000_000 + i as i64 * HOUR, *p))
        .collect()
}

/// 确定性的伪随机序列
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[test]
fn test_sideways_market() {
    let points = hourly(&[100.0, 100.3, 99.8, 100.2, 100.1]);
    let trend = TrendClassifier::default()
        .classify("bitcoin", &points, Timeframe::H24)
        .unwrap()
        .unwrap();
    assert_eq!(trend.trend_type, TrendType::Sideways);
}

#[test]
fn test_steady_uptrend() {
    let prices: Vec<f64> = (0..24).map(|i| 100.0 + 12.0 * i as f64 / 23.0).collect();
    let trend = TrendClassifier::default()
        .classify("bitcoin", &hourly(&prices), Timeframe::H24)
        .unwrap()
        .unwrap();
    assert_eq!(trend.trend_type, TrendType::Uptrend);
    assert!(approx_eq!(f64, trend.price_change_percent, 12.0, epsilon = 1e-9));
    assert!(trend.metadata.r_squared > 0.99);
}

#[test]
fn test_pump_and_dump() {
    let mut prices: Vec<f64> = (0..12).map(|i| 100.0 + 35.0 * i as f64 / 11.0).collect();
    prices.extend((0..12).map(|i| 135.0 - 35.0 * i as f64 / 11.0));
    let event = PumpAndDumpDetector::default()
        .detect("bitcoin", &hourly(&prices))
        .unwrap()
        .unwrap();
    assert_eq!(event.signal_type, SignalType::PumpAndDump);
    assert!(approx_eq!(f64, event.confidence, 0.609, epsilon = 1e-3));
}

#[test]
fn test_bottomed_out_with_five_points() {
    let points = hourly(&[100.0, 95.0, 90.0, 93.0, 97.0]);
    assert_eq!(BottomedOutDetector::default().detect("bitcoin", &points), Ok(None));
}

#[test]
fn test_percent_change_from_zero() {
    assert!(matches!(percent_change(0.0, 50.0), Err(AnalysisError::Indeterminate(_))));
}

#[test]
fn test_bounds_on_random_series() {
    let mut rng = Lcg(42);
    let classifier = TrendClassifier::default();
    let detectors = SignalDetectorSet::new(&SignalThresholds::default())
        .with_trend_signals(&SignalThresholds::default(), TrendClassifier::default());

    for round in 0..50 {
        let len = 3 + (rng.next_f64() * 60.0) as usize;
        let points: Vec<PricePoint> = (0..len)
            .map(|i| {
                // 价格跨越多个数量级，偶尔出现极端放量
                let price = 10f64.powf(rng.next_f64() * 8.0 - 4.0);
                let volume = if rng.next_f64() > 0.9 { 1e15 } else { rng.next_f64() * 1e6 };
                PricePoint::new("bitcoin", i as i64 * HOUR * 24, price).with_volume(volume)
            })
            .collect();

        let indexed: Vec<(f64, f64)> = points.iter().enumerate().map(|(i, p)| (i as f64, p.price)).collect();
        let regression = linear_regression(&indexed).unwrap();
        assert!((0.0..=1.0).contains(&regression.r_squared), "round {}", round);

        for timeframe in Timeframe::ALL {
            if let Some(trend) = classifier.classify("bitcoin", &points, timeframe).unwrap() {
                assert!((0.0..=1.0).contains(&trend.confidence), "round {}", round);
            }
        }

        let outcome = detectors.detect_all("bitcoin", &points).unwrap();
        for event in outcome.events {
            assert!((0.0..=1.0).contains(&event.confidence), "round {} {:?}", round, event);
        }
    }
}
