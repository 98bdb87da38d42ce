use kawase_core::analysis::entity::{ForecastResult, TrendDirection};
use kawase_core::analysis::error::AnalysisError;

/// # Summary
/// 普通最小二乘回归预测器：以下标为自变量拟合收盘价，
/// 预测窗口外一步的价格并给出 R² 置信度。
///
/// # Invariants
/// - `confidence_pct` 始终钳制在 [0, 100]，即便 R² 为负 (劣于均值预测)。
/// - 零方差窗口 (SStot = 0) 的置信度定义为 0，不传播 NaN。
///
/// # Arguments
/// * `closes`: 按时间升序的收盘价窗口 (调用方负责截取尾窗)。
///
/// # Returns
/// 成功返回预测结果；窗口短于 2 个样本返回 `InsufficientData`。
pub fn predict(closes: &[f64]) -> Result<ForecastResult, AnalysisError> {
    let n = closes.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData {
            required: 2,
            actual: n,
        });
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for (i, &price) in closes.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += price;
        sum_xy += x * price;
        sum_x2 += x * x;
    }

    // x 取 0..n-1 且 n >= 2，分母恒为正
    let slope = (nf * sum_xy - sum_x * sum_y) / (nf * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / nf;

    // 预测窗口外一步 (x = n)
    let predicted_price = slope * nf + intercept;
    let last = closes[n - 1];
    let expected_change_pct = (predicted_price - last) / last * 100.0;

    let mean = sum_y / nf;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, &price) in closes.iter().enumerate() {
        let fitted = slope * i as f64 + intercept;
        ss_res += (price - fitted).powi(2);
        ss_tot += (price - mean).powi(2);
    }

    let confidence_pct = if ss_tot == 0.0 {
        0.0
    } else {
        ((1.0 - ss_res / ss_tot) * 100.0).clamp(0.0, 100.0)
    };

    let trend = if expected_change_pct > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    Ok(ForecastResult {
        predicted_price,
        expected_change_pct,
        trend,
        confidence_pct,
        slope,
    })
}
