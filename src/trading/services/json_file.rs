//! 命令行使用的 JSON 文件输入输出

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::trading::model::{AnalysisRun, Asset, PricePoint, SignalEvent, TrendResult};
use crate::trading::services::memory::InMemoryMarketData;

/// 价格历史输入文件
///
/// ```json
/// {"assets": [{"id": "bitcoin", "symbol": "BTC"}],
///  "prices": [{"asset_id": "bitcoin", "ts": 1700000000000, "price": 37000.0, "volume": 1.2e10}]}
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PriceHistoryFile {
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}

impl PriceHistoryFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("读取价格文件失败: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("解析价格文件失败: {}", path.display()))
    }

    /// 转成内存数据源，价格点按文件中的顺序分组
    pub fn into_market_data(self) -> InMemoryMarketData {
        let mut data = InMemoryMarketData::new();
        for asset in self.assets {
            data.add_asset(asset);
        }
        data.add_prices(self.prices);
        data
    }
}

/// 一次运行的输出
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub run: AnalysisRun,
    pub trends: Vec<TrendResult>,
    pub signals: Vec<SignalEvent>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 写入文件，未指定路径时输出到标准输出
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        let json = self.to_json()?;
        match path {
            Some(path) => fs::write(path, json)
                .with_context(|| format!("写入结果文件失败: {}", path.display()))?,
            None => println!("{}", json),
        }
        Ok(())
    }
}
