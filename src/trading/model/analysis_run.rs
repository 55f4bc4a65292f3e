use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trading::model::signal_event::SignalEvent;
use crate::trading::model::trend_result::TrendResult;

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
        }
    }
}

/// 一次分析运行的记录，仅用于观测
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    pub id: Uuid,
    pub run_type: String,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub status: RunStatus,
    pub assets_processed: usize,
    pub error_count: usize,
    pub error_message: Option<String>,
    pub trends_stored: usize,
    pub signals_detected: usize,
    /// 因无法计算而跳过的检测次数
    pub skipped_detectors: usize,
    pub duration_ms: i64,
}

impl AnalysisRun {
    pub fn start(run_type: &str, started_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_type: run_type.to_string(),
            started_at,
            completed_at: None,
            status: RunStatus::Running,
            assets_processed: 0,
            error_count: 0,
            error_message: None,
            trends_stored: 0,
            signals_detected: 0,
            skipped_detectors: 0,
            duration_ms: 0,
        }
    }

    pub fn complete(&mut self, completed_at: i64) {
        self.finish(RunStatus::Completed, completed_at);
    }

    pub fn fail(&mut self, message: String, completed_at: i64) {
        self.error_message = Some(message);
        self.finish(RunStatus::Failed, completed_at);
    }

    fn finish(&mut self, status: RunStatus, completed_at: i64) {
        self.status = status;
        self.completed_at = Some(completed_at);
        self.duration_ms = (completed_at - self.started_at).max(0);
    }
}

/// 一次运行交给存储方的结果批次
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AnalysisBatch {
    pub trends: Vec<TrendResult>,
    pub signals: Vec<SignalEvent>,
}

impl AnalysisBatch {
    pub fn is_empty(&self) -> bool {
        self.trends.is_empty() && self.signals.is_empty()
    }

    pub fn merge(&mut self, other: AnalysisBatch) {
        self.trends.extend(other.trends);
        self.signals.extend(other.signals);
    }
}
