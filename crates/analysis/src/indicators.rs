use kawase_core::analysis::entity::{
    CandlePattern, Direction, IndicatorSnapshot, PatternKind, PivotLevels,
};
use kawase_core::analysis::error::AnalysisError;
use kawase_core::config::WindowConfig;
use kawase_core::market::entity::Candle;

/// # Summary
/// 经典 Wilder 风格 RSI，采用前 `period` 个差分的简单平均。
///
/// # Invariants
/// - 返回值始终位于 [0, 100]。
/// - 平均亏损为零视为无界上涨，返回 100 而不是产生除零。
///
/// # Arguments
/// * `closes`: 按时间升序的收盘价序列。
/// * `period`: RSI 周期。
///
/// # Returns
/// 成功返回 RSI 值；样本不足返回 `InsufficientData`。
pub fn rsi(closes: &[f64], period: usize) -> Result<f64, AnalysisError> {
    let required = period + 1;
    if closes.len() < required {
        return Err(AnalysisError::InsufficientData {
            required,
            actual: closes.len(),
        });
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses += change.abs();
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - 100.0 / (1.0 + rs))
}

/// # Summary
/// 指数移动平均。以首个价格为种子，在 `min(len, period*2)` 个样本上
/// 应用平滑因子 k = 2 / (period + 1)。
///
/// # Arguments
/// * `closes`: 按时间升序的收盘价序列。
/// * `period`: EMA 周期。
///
/// # Returns
/// 成功返回 EMA 值；样本不足返回 `InsufficientData`。
pub fn ema(closes: &[f64], period: usize) -> Result<f64, AnalysisError> {
    if closes.len() < period {
        return Err(AnalysisError::InsufficientData {
            required: period,
            actual: closes.len(),
        });
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = closes[0];
    let limit = closes.len().min(period * 2);
    for &price in &closes[1..limit] {
        ema = price * k + ema * (1.0 - k);
    }
    Ok(ema)
}

/// # Summary
/// 平均真实波幅。真实波幅取 max(高-低, |高-前收|, |低-前收|)，
/// 从下标 1 开始最多取 `period` 个样本求平均。
///
/// # Arguments
/// * `candles`: 按时间升序的 K 线窗口。
/// * `period`: ATR 周期。
///
/// # Returns
/// 成功返回 ATR 值；窗口短于 2 根返回 `InsufficientData`。
pub fn atr(candles: &[Candle], period: usize) -> Result<f64, AnalysisError> {
    if candles.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            required: 2,
            actual: candles.len(),
        });
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 1..candles.len() {
        if count >= period {
            break;
        }
        let prev_close = candles[i - 1].close;
        let tr = (candles[i].high - candles[i].low)
            .max((candles[i].high - prev_close).abs())
            .max((candles[i].low - prev_close).abs());
        sum += tr;
        count += 1;
    }
    Ok(sum / count as f64)
}

/// # Summary
/// 地板交易员枢轴位公式。
///
/// # Invariants
/// - R1 + S1 == 2 × pivot。
/// - high > low 时阻力位严格递增、支撑位严格递减。
pub fn pivot_points(high: f64, low: f64, close: f64) -> PivotLevels {
    let pivot = (high + low + close) / 3.0;

    let r1 = 2.0 * pivot - low;
    let r2 = pivot + (high - low);
    let r3 = high + 2.0 * (pivot - low);

    let s1 = 2.0 * pivot - high;
    let s2 = pivot - (high - low);
    let s3 = low - 2.0 * (high - pivot);

    PivotLevels {
        pivot,
        resistances: [r1, r2, r3],
        supports: [s1, s2, s3],
    }
}

/// # Summary
/// 规则式蜡烛形态分类，按优先级取首个命中。
///
/// # Logic
/// 1. 锤子线：下影 > 2×实体 且 上影 < 0.3×实体 (看多, 强度 2)。
/// 2. 射击之星：上影 > 2×实体 且 下影 < 0.3×实体 (看空, 强度 2)。
/// 3. 看多吞没：当前阳线包住前一根阴线的实体 (强度 3)。
/// 4. 看空吞没：当前阴线包住前一根阳线的实体 (强度 3)。
/// 5. 十字星：实体 < 0.1×振幅 (中性, 强度 0)。
/// 6. 其余视为无形态。
///
/// # Arguments
/// * `latest`: 最新一根 K 线。
/// * `previous`: 倒数第二根 K 线。
///
/// # Returns
/// 返回形态分类结果。
pub fn classify_pattern(latest: &Candle, previous: &Candle) -> CandlePattern {
    let body = (latest.close - latest.open).abs();
    let upper_shadow = latest.high - latest.close.max(latest.open);
    let lower_shadow = latest.close.min(latest.open) - latest.low;
    let range = latest.high - latest.low;

    let bullish = latest.close > latest.open;
    let bearish = latest.close < latest.open;
    let prev_bullish = previous.close > previous.open;
    let prev_bearish = previous.close < previous.open;

    if lower_shadow > body * 2.0 && upper_shadow < body * 0.3 && range > 0.0 {
        return CandlePattern {
            kind: PatternKind::Hammer,
            signal: Direction::Buy,
            strength: 2,
        };
    }

    if upper_shadow > body * 2.0 && lower_shadow < body * 0.3 && range > 0.0 {
        return CandlePattern {
            kind: PatternKind::ShootingStar,
            signal: Direction::Sell,
            strength: 2,
        };
    }

    if bullish && prev_bearish && latest.close > previous.open && latest.open < previous.close {
        return CandlePattern {
            kind: PatternKind::BullishEngulfing,
            signal: Direction::Buy,
            strength: 3,
        };
    }

    if bearish && prev_bullish && latest.close < previous.open && latest.open > previous.close {
        return CandlePattern {
            kind: PatternKind::BearishEngulfing,
            signal: Direction::Sell,
            strength: 3,
        };
    }

    if body < range * 0.1 {
        return CandlePattern {
            kind: PatternKind::Doji,
            signal: Direction::Neutral,
            strength: 0,
        };
    }

    CandlePattern {
        kind: PatternKind::None,
        signal: Direction::Neutral,
        strength: 0,
    }
}

/// # Summary
/// 在一个按时间升序的 K 线窗口上组装完整的指标快照。
///
/// # Logic
/// 1. RSI 与三条 EMA 基于收盘价序列。
/// 2. ATR 基于最近 `atr_period + 1` 根 K 线。
/// 3. 枢轴位取最近 `pivot_window` 根的最高/最低价，参考收盘价为
///    紧邻该窗口之前的那根 K 线；历史不足时回退到最新收盘价。
/// 4. 形态由最后两根 K 线判定。
///
/// # Arguments
/// * `candles`: 按时间升序的 K 线序列。
/// * `windows`: 指标窗口参数。
///
/// # Returns
/// 成功返回指标快照；窗口不足返回 `InsufficientData`。
pub fn snapshot(candles: &[Candle], windows: &WindowConfig) -> Result<IndicatorSnapshot, AnalysisError> {
    let required = windows
        .ema_slow
        .max(windows.rsi_period + 1)
        .max(windows.pivot_window)
        .max(2);
    if candles.len() < required {
        return Err(AnalysisError::InsufficientData {
            required,
            actual: candles.len(),
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let len = candles.len();

    let rsi14 = rsi(&closes, windows.rsi_period)?;
    let ema9 = ema(&closes, windows.ema_fast)?;
    let ema21 = ema(&closes, windows.ema_mid)?;
    let ema50 = ema(&closes, windows.ema_slow)?;

    let atr_start = len.saturating_sub(windows.atr_period + 1);
    let atr14 = atr(&candles[atr_start..], windows.atr_period)?;

    let window = &candles[len - windows.pivot_window..];
    let high = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let low = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    let close_ref = if len > windows.pivot_window {
        candles[len - windows.pivot_window - 1].close
    } else {
        closes[len - 1]
    };
    let pivots = pivot_points(high, low, close_ref);

    let pattern = classify_pattern(&candles[len - 1], &candles[len - 2]);

    Ok(IndicatorSnapshot {
        rsi14,
        ema9,
        ema21,
        ema50,
        atr14,
        pivots,
        pattern,
    })
}
