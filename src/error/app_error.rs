use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// 分析引擎错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// 输入数据不合法（时间戳非递增、价格非正、成交量为负等）
    #[error("数据校验错误: {0}")]
    Validation(String),

    /// 数据点不足，调用方应视为“无结果”
    #[error("数据不足: 需要 {required} 个数据点, 实际 {actual} 个")]
    InsufficientData { required: usize, actual: usize },

    /// 除零等无法确定结果的计算
    #[error("无法计算: {0}")]
    Indeterminate(String),

    /// 整个运行被中止（资产列表不可用、结果无法写入）
    #[error("分析任务中止: {0}")]
    RunAborted(String),
}

impl AnalysisError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AnalysisError::Validation(msg.into())
    }

    pub fn indeterminate(msg: impl Into<String>) -> Self {
        AnalysisError::Indeterminate(msg.into())
    }

    /// 数据不足和无法计算都不算失败，只是没有结果
    pub fn is_no_result(&self) -> bool {
        matches!(
            self,
            AnalysisError::InsufficientData { .. } | AnalysisError::Indeterminate(_)
        )
    }
}

/// 把任何错误转换为运行中止错误
pub fn to_run_aborted<E: std::fmt::Display>(err: E) -> AnalysisError {
    AnalysisError::RunAborted(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_result_errors() {
        assert!(AnalysisError::InsufficientData { required: 3, actual: 2 }.is_no_result());
        assert!(AnalysisError::indeterminate("start = 0").is_no_result());
        assert!(!AnalysisError::validation("price <= 0").is_no_result());
        assert!(!to_run_aborted("db down").is_no_result());
    }

    #[test]
    fn test_error_message() {
        let err = AnalysisError::InsufficientData { required: 14, actual: 5 };
        assert_eq!(err.to_string(), "数据不足: 需要 14 个数据点, 实际 5 个");
    }
}
