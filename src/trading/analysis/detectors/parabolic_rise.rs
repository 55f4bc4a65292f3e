use serde_json::json;

use crate::error::Result;
use crate::trading::analysis::config::ParabolicRiseConfig;
use crate::trading::analysis::signal_detector::{tail, window_bounds, SignalDetector};
use crate::trading::indicator::statistics::{mean, step_changes};
use crate::trading::model::price_point::prices;
use crate::trading::model::{PricePoint, SignalEvent, SignalType};

/// 抛物线上涨：逐日涨幅至少加速 3 次，且涨幅之和超过 50%
#[derive(Debug, Clone, Default)]
pub struct ParabolicRiseDetector {
    config: ParabolicRiseConfig,
}

impl ParabolicRiseDetector {
    pub fn new(config: ParabolicRiseConfig) -> Self {
        Self { config }
    }
}

impl SignalDetector for ParabolicRiseDetector {
    fn name(&self) -> &'static str {
        SignalType::ParabolicRise.as_str()
    }

    fn detect(&self, asset_id: &str, points: &[PricePoint]) -> Result<Option<SignalEvent>> {
        let Some(window) = tail(points, self.config.window) else {
            return Ok(None);
        };
        let changes = step_changes(&prices(window))?;
        if changes.len() < 2 {
            return Ok(None);
        }

        let accelerations = changes.windows(2).filter(|c| c[1] > c[0]).count();
        let total_rise: f64 = changes.iter().sum();
        if !(accelerations >= self.config.min_accelerations && total_rise > self.config.total_rise_threshold) {
            return Ok(None);
        }

        let trigger_price = window[window.len() - 1].price;
        let event = SignalEvent::new(
            asset_id,
            SignalType::ParabolicRise,
            window_bounds(window),
            total_rise / 100.0,
            trigger_price,
        )
        .with_metadata(json!({
            "total_rise_percent": total_rise,
            "increasing_changes": accelerations,
            "avg_daily_change": mean(&changes)?,
        }));
        Ok(Some(event))
    }
}
