use kawase_core::analysis::entity::VolatilityResult;
use kawase_core::analysis::error::AnalysisError;
use kawase_core::config::WindowConfig;
use kawase_core::market::entity::Candle;

/// # Summary
/// 波动率与动量统计：相邻收盘价的百分比收益率的总体标准差、
/// 相对 N 周期前收盘价的动量、以及最新成交量相对均量的比值。
///
/// # Invariants
/// - 均量为零 (外汇现货常见) 时相对成交量定义为 0，不产生 NaN。
///
/// # Arguments
/// * `candles`: 按时间升序的 K 线窗口 (调用方负责截取尾窗)。
/// * `windows`: 统计窗口参数。
///
/// # Returns
/// 成功返回统计结果；窗口不足返回 `InsufficientData`。
pub fn analyze(candles: &[Candle], windows: &WindowConfig) -> Result<VolatilityResult, AnalysisError> {
    let n = candles.len();
    let required = (windows.momentum_lookback + 1)
        .max(windows.volume_window)
        .max(2);
    if n < required {
        return Err(AnalysisError::InsufficientData {
            required,
            actual: n,
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    // 收益率的总体标准差
    let returns: Vec<f64> = closes
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / returns.len() as f64;
    let volatility_pct = variance.sqrt();

    // 相对 lookback 周期前收盘价的动量
    let base = closes[n - 1 - windows.momentum_lookback];
    let momentum_pct = (closes[n - 1] - base) / base * 100.0;

    // 最新成交量相对近 volume_window 根均量的比值
    let volumes = &candles[n - windows.volume_window..];
    let mean_volume = volumes.iter().map(|c| c.volume).sum::<f64>() / windows.volume_window as f64;
    let relative_volume = if mean_volume == 0.0 {
        0.0
    } else {
        candles[n - 1].volume / mean_volume
    };

    Ok(VolatilityResult {
        volatility_pct,
        momentum_pct,
        relative_volume,
    })
}
