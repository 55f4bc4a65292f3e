use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// 资产（由外部资产注册表提供）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub rank: Option<u32>,
}

fn default_active() -> bool {
    true
}

impl Asset {
    pub fn new(id: &str, symbol: &str) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: String::new(),
            is_active: true,
            rank: None,
        }
    }
}

/// 价格观测点
///
/// 同一资产的序列必须按时间戳升序给出，允许缺口（缺失的点不补零）。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PricePoint {
    pub asset_id: String,
    /// 时间戳，UTC 毫秒
    pub ts: i64,
    /// 价格，必须为正
    pub price: f64,
    /// 成交量，可能缺失
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
}

impl PricePoint {
    pub fn new(asset_id: &str, ts: i64, price: f64) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            ts,
            price,
            volume: None,
            open: None,
            high: None,
            low: None,
            close: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_ohlc(mut self, o: f64, h: f64, l: f64, c: f64) -> Self {
        self.open = Some(o);
        self.high = Some(h);
        self.low = Some(l);
        self.close = Some(c);
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(AnalysisError::validation(format!(
                "{} ts={} 价格必须为正: {}",
                self.asset_id, self.ts, self.price
            )));
        }
        if let Some(v) = self.volume {
            if !v.is_finite() || v < 0.0 {
                return Err(AnalysisError::validation(format!(
                    "{} ts={} 成交量不能为负: {}",
                    self.asset_id, self.ts, v
                )));
            }
        }
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(AnalysisError::validation(format!(
                        "{} ts={} {} 必须为正: {}",
                        self.asset_id, self.ts, name, v
                    )));
                }
            }
        }
        if let (Some(h), Some(l)) = (self.high, self.low) {
            if h < l {
                return Err(AnalysisError::validation(format!(
                    "{} ts={} high < low: {} < {}",
                    self.asset_id, self.ts, h, l
                )));
            }
        }
        Ok(())
    }
}

/// 校验一个资产的价格序列
///
/// 时间戳必须严格递增，不做排序或修正，发现问题直接返回 `Validation`。
pub fn validate_series(points: &[PricePoint]) -> Result<()> {
    let Some(first) = points.first() else {
        return Ok(());
    };
    for point in points {
        if point.asset_id != first.asset_id {
            return Err(AnalysisError::validation(format!(
                "序列中混入其他资产: {} != {}",
                point.asset_id, first.asset_id
            )));
        }
        point.validate()?;
    }
    for pair in points.windows(2) {
        if pair[1].ts <= pair[0].ts {
            return Err(AnalysisError::validation(format!(
                "{} 时间戳非递增: {} -> {}",
                first.asset_id, pair[0].ts, pair[1].ts
            )));
        }
    }
    Ok(())
}

/// 取出价格列
pub fn prices(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|p| p.price).collect()
}
