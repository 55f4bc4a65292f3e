use serde_json::json;

use crate::error::Result;
use crate::trading::analysis::config::CapitulationDropConfig;
use crate::trading::analysis::detectors::bottomed_out::phase_change;
use crate::trading::analysis::signal_detector::{tail, window_bounds, SignalDetector};
use crate::trading::indicator::statistics::split_phases;
use crate::trading::model::{PricePoint, SignalEvent, SignalType};

/// 投降式下跌：前一周已跌超 15%，后一周再急跌超 25%
#[derive(Debug, Clone, Default)]
pub struct CapitulationDropDetector {
    config: CapitulationDropConfig,
}

impl CapitulationDropDetector {
    pub fn new(config: CapitulationDropConfig) -> Self {
        Self { config }
    }
}

impl SignalDetector for CapitulationDropDetector {
    fn name(&self) -> &'static str {
        SignalType::CapitulationDrop.as_str()
    }

    fn detect(&self, asset_id: &str, points: &[PricePoint]) -> Result<Option<SignalEvent>> {
        let Some(window) = tail(points, self.config.window) else {
            return Ok(None);
        };
        let Some(weeks) = split_phases(window, 2) else {
            return Ok(None);
        };

        let downtrend = phase_change(weeks[0])?;
        let drop = phase_change(weeks[1])?;
        if !(downtrend < self.config.downtrend_threshold && drop < self.config.drop_threshold) {
            return Ok(None);
        }

        let trigger_price = window[window.len() - 1].price;
        let event = SignalEvent::new(
            asset_id,
            SignalType::CapitulationDrop,
            window_bounds(window),
            (downtrend.abs() + drop.abs()) / 100.0,
            trigger_price,
        )
        .with_metadata(json!({
            "downtrend_percent": downtrend,
            "drop_percent": drop,
            "total_decline": downtrend + drop,
        }));
        Ok(Some(event))
    }
}
