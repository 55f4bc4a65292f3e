//! 统计基础函数：线性回归、涨跌幅、波动率、阶段切分

use crate::error::{AnalysisError, Result};

/// 最小二乘回归结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    /// 决定系数 (0.0 - 1.0)
    pub r_squared: f64,
}

/// 普通最小二乘线性回归
///
/// - 少于 2 个点返回 `InsufficientData`
/// - 所有 y 相同视为对常数的完美拟合：slope = 0, r_squared = 1
/// - 所有 x 相同返回 `Indeterminate`
pub fn linear_regression(points: &[(f64, f64)]) -> Result<Regression> {
    if points.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            required: 2,
            actual: points.len(),
        });
    }
    if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(AnalysisError::indeterminate("回归输入包含非有限值"));
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx == 0.0 {
        return Err(AnalysisError::indeterminate("回归自变量全部相同"));
    }
    if syy == 0.0 {
        return Ok(Regression {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 1.0,
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = ((sxy * sxy) / (sxx * syy)).clamp(0.0, 1.0);

    Ok(Regression {
        slope,
        intercept,
        r_squared,
    })
}

/// 涨跌幅（百分比）: (end - start) * 100 / start
///
/// 起始值为 0 时无法确定，返回 `Indeterminate` 而不是 inf/NaN。
pub fn percent_change(start_value: f64, end_value: f64) -> Result<f64> {
    if start_value == 0.0 {
        return Err(AnalysisError::indeterminate(format!(
            "起始值为 0, 无法计算涨跌幅 (end = {})",
            end_value
        )));
    }
    let pct = (end_value - start_value) * 100.0 / start_value;
    if !pct.is_finite() {
        return Err(AnalysisError::indeterminate(format!(
            "涨跌幅结果非有限值: start = {}, end = {}",
            start_value, end_value
        )));
    }
    Ok(pct)
}

pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(AnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// 总体标准差
pub fn std_dev(values: &[f64]) -> Result<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

/// 波动率：标准差 / 均值
pub fn volatility(values: &[f64]) -> Result<f64> {
    let avg = mean(values)?;
    if avg == 0.0 {
        return Err(AnalysisError::indeterminate("均值为 0, 无法计算波动率"));
    }
    Ok(std_dev(values)? / avg)
}

/// 置信度截断到 [0, 1]，NaN 视为 0
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// 把有序序列切成 n 段等长的连续阶段
///
/// 长度不能被 n 整除或为空时返回 None。
pub fn split_phases<T>(values: &[T], n: usize) -> Option<Vec<&[T]>> {
    if n == 0 || values.is_empty() || values.len() % n != 0 {
        return None;
    }
    Some(values.chunks(values.len() / n).collect())
}

/// 相邻点的涨跌幅序列（百分比）
pub fn step_changes(values: &[f64]) -> Result<Vec<f64>> {
    values
        .windows(2)
        .map(|pair| percent_change(pair[0], pair[1]))
        .collect()
}

/// 趋势强度：平均涨跌幅乘以变化一致性，结果在 [0, 1]
///
/// 少于 5 个点返回 0。
pub fn trend_strength(prices: &[f64]) -> f64 {
    if prices.len() < 5 {
        return 0.0;
    }
    let Ok(changes) = step_changes(prices) else {
        return 0.0;
    };
    let changes: Vec<f64> = changes.iter().map(|c| c / 100.0).collect();
    let (Ok(avg), Ok(std)) = (mean(&changes), std_dev(&changes)) else {
        return 0.0;
    };
    let consistency = 1.0 - std / (avg.abs() + 0.001);
    clamp_confidence(avg.abs() * consistency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn indexed(values: &[f64]) -> Vec<(f64, f64)> {
        values.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect()
    }

    #[test]
    fn test_linear_regression_perfect_line() {
        let reg = linear_regression(&indexed(&[1.0, 3.0, 5.0, 7.0])).unwrap();
        assert!(approx_eq!(f64, reg.slope, 2.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, reg.intercept, 1.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, reg.r_squared, 1.0, epsilon = 1e-12));
    }

    #[test]
    fn test_linear_regression_noisy() {
        let reg = linear_regression(&indexed(&[1.0, 2.0, 1.3, 3.75, 2.25])).unwrap();
        assert!(approx_eq!(f64, reg.slope, 0.425, epsilon = 1e-9));
        assert!(approx_eq!(f64, reg.intercept, 1.21, epsilon = 1e-9));
        assert!(reg.r_squared > 0.0 && reg.r_squared < 1.0);
    }

    #[test]
    fn test_linear_regression_constant() {
        let reg = linear_regression(&indexed(&[5.0, 5.0, 5.0])).unwrap();
        assert_eq!(reg.slope, 0.0);
        assert_eq!(reg.intercept, 5.0);
        assert_eq!(reg.r_squared, 1.0);
    }

    #[test]
    fn test_linear_regression_insufficient() {
        let err = linear_regression(&indexed(&[5.0])).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientData { required: 2, actual: 1 });
        assert!(linear_regression(&[]).is_err());
    }

    #[test]
    fn test_linear_regression_vertical() {
        let err = linear_regression(&[(1.0, 1.0), (1.0, 2.0)]).unwrap_err();
        assert!(matches!(err, AnalysisError::Indeterminate(_)));
    }

    #[test]
    fn test_r_squared_in_range() {
        let series = [
            vec![100.0, 250.0, 80.0, 3000.0, 1.0, 0.5, 99999.0],
            vec![1.0, 1.0000001, 0.9999999, 1.0],
            vec![1e-9, 1e9, 1e-9],
        ];
        for values in series {
            let reg = linear_regression(&indexed(&values)).unwrap();
            assert!((0.0..=1.0).contains(&reg.r_squared), "{:?}", reg);
        }
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(100.0, 112.0).unwrap(), 12.0);
        assert_eq!(percent_change(100.0, 130.0).unwrap(), 30.0);
        assert!(approx_eq!(f64, percent_change(135.0, 100.0).unwrap(), -25.925925925925927, epsilon = 1e-12));
    }

    #[test]
    fn test_percent_change_zero_start() {
        let err = percent_change(0.0, 50.0).unwrap_err();
        assert!(matches!(err, AnalysisError::Indeterminate(_)));
    }

    #[test]
    fn test_volatility() {
        let v = volatility(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(approx_eq!(f64, v, 0.4, epsilon = 1e-12));
        assert!(matches!(volatility(&[-1.0, 1.0]), Err(AnalysisError::Indeterminate(_))));
        assert!(matches!(volatility(&[]), Err(AnalysisError::InsufficientData { .. })));
    }

    #[test]
    fn test_clamp_confidence() {
        assert_eq!(clamp_confidence(1.7), 1.0);
        assert_eq!(clamp_confidence(-0.1), 0.0);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);
        assert_eq!(clamp_confidence(f64::INFINITY), 1.0);
        assert_eq!(clamp_confidence(0.42), 0.42);
    }

    #[test]
    fn test_split_phases() {
        let values: Vec<i32> = (0..14).collect();
        let phases = split_phases(&values, 2).unwrap();
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0], &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(phases[1], &[7, 8, 9, 10, 11, 12, 13]);
        assert!(split_phases(&values, 3).is_none());
        assert!(split_phases::<i32>(&[], 2).is_none());
        assert!(split_phases(&values, 0).is_none());
    }

    #[test]
    fn test_trend_strength() {
        assert_eq!(trend_strength(&[1.0, 2.0, 3.0]), 0.0);
        let steady: Vec<f64> = (0..10).map(|i| 100.0 * 1.02f64.powi(i)).collect();
        let s = trend_strength(&steady);
        assert!(s > 0.0 && s <= 1.0);
        let choppy = [100.0, 120.0, 90.0, 130.0, 80.0, 125.0];
        assert_eq!(trend_strength(&choppy), 0.0);
    }
}
