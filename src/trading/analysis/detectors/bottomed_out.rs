use serde_json::json;

use crate::error::Result;
use crate::trading::analysis::config::BottomedOutConfig;
use crate::trading::analysis::signal_detector::{min_price, tail, window_bounds, SignalDetector};
use crate::trading::indicator::statistics::{percent_change, split_phases};
use crate::trading::model::{PricePoint, SignalEvent, SignalType};

/// 首尾涨跌幅
pub(crate) fn phase_change(phase: &[PricePoint]) -> Result<f64> {
    match (phase.first(), phase.last()) {
        (Some(first), Some(last)) => percent_change(first.price, last.price),
        _ => Ok(0.0),
    }
}

/// 筑底反弹：前一周下跌超过 10%，后一周反弹超过 8%
#[derive(Debug, Clone, Default)]
pub struct BottomedOutDetector {
    config: BottomedOutConfig,
}

impl BottomedOutDetector {
    pub fn new(config: BottomedOutConfig) -> Self {
        Self { config }
    }
}

impl SignalDetector for BottomedOutDetector {
    fn name(&self) -> &'static str {
        SignalType::BottomedOut.as_str()
    }

    fn detect(&self, asset_id: &str, points: &[PricePoint]) -> Result<Option<SignalEvent>> {
        let Some(window) = tail(points, self.config.window) else {
            return Ok(None);
        };
        let Some(weeks) = split_phases(window, 2) else {
            return Ok(None);
        };

        let decline = phase_change(weeks[0])?;
        let recovery = phase_change(weeks[1])?;
        if !(decline < self.config.decline_threshold && recovery > self.config.recovery_threshold) {
            return Ok(None);
        }

        let trigger_price = window[window.len() - 1].price;
        let event = SignalEvent::new(
            asset_id,
            SignalType::BottomedOut,
            window_bounds(window),
            (decline.abs() + recovery) / self.config.confidence_scale,
            trigger_price,
        )
        .with_metadata(json!({
            "downtrend_percent": decline,
            "recovery_percent": recovery,
            "lowest_price": min_price(window),
        }));
        Ok(Some(event))
    }
}
