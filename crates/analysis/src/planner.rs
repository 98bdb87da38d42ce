use kawase_core::analysis::entity::{Direction, IndicatorSnapshot, TechnicalSignal, TradePlan};
use kawase_core::analysis::error::AnalysisError;
use kawase_core::config::ScoringConfig;
use tracing::debug;

/// # Summary
/// 入场/出场规划器：基于指标快照对买卖双边独立计分，
/// 仅当单边得分严格领先且达到最低门槛时产出方向性信号与交易计划。
///
/// # Logic
/// 1. RSI 区间规则：超卖 买+3 / 偏低 买+1 / 超买 卖+3 / 偏高 卖+1。
/// 2. EMA 堆叠规则：价格>EMA9>EMA21>EMA50 买+3；完全倒置 卖+3。
/// 3. 蜡烛形态：强度计入与其信号同侧。
/// 4. 枢轴位接近：|价格-S1| < 0.5×ATR 买+2；|价格-R1| < 0.5×ATR 卖+2。
/// 5. 决策：单边 > 另一边 且 ≥ 最低点数才给出方向；方向性信号要求 ATR > 0。
///
/// # Invariants
/// - 双边打平或最高单边不足门槛时必为 Neutral，且不携带交易计划。
/// - ATR ≤ 0 时拒绝产出方向性计划 (退化输入)，避免无穷盈亏比。
///
/// # Arguments
/// * `snapshot`: 指标快照。
/// * `price`: 当前价格。
/// * `scoring`: 计分策略常量。
///
/// # Returns
/// 成功返回技术面信号；退化输入返回 `DegenerateInput`。
pub fn plan(
    snapshot: &IndicatorSnapshot,
    price: f64,
    scoring: &ScoringConfig,
) -> Result<TechnicalSignal, AnalysisError> {
    let mut buy_points = 0u32;
    let mut sell_points = 0u32;
    let mut reasons = Vec::new();

    // 1. RSI
    if snapshot.rsi14 < scoring.rsi_oversold {
        buy_points += 3;
        reasons.push(format!("RSI oversold (<{})", scoring.rsi_oversold));
    } else if snapshot.rsi14 < scoring.rsi_low {
        buy_points += 1;
        reasons.push(format!("RSI low (<{})", scoring.rsi_low));
    } else if snapshot.rsi14 > scoring.rsi_overbought {
        sell_points += 3;
        reasons.push(format!("RSI overbought (>{})", scoring.rsi_overbought));
    } else if snapshot.rsi14 > scoring.rsi_high {
        sell_points += 1;
        reasons.push(format!("RSI high (>{})", scoring.rsi_high));
    }

    // 2. EMA 堆叠
    if price > snapshot.ema9 && snapshot.ema9 > snapshot.ema21 && snapshot.ema21 > snapshot.ema50 {
        buy_points += 3;
        reasons.push("Bullish EMA alignment".to_string());
    } else if price < snapshot.ema9
        && snapshot.ema9 < snapshot.ema21
        && snapshot.ema21 < snapshot.ema50
    {
        sell_points += 3;
        reasons.push("Bearish EMA alignment".to_string());
    }

    // 3. 蜡烛形态
    match snapshot.pattern.signal {
        Direction::Buy => {
            buy_points += snapshot.pattern.strength;
            reasons.push(format!("{} pattern", snapshot.pattern.kind));
        }
        Direction::Sell => {
            sell_points += snapshot.pattern.strength;
            reasons.push(format!("{} pattern", snapshot.pattern.kind));
        }
        Direction::Neutral => {}
    }

    // 4. 枢轴位接近
    let proximity = snapshot.atr14 * scoring.pivot_proximity_atr;
    if (price - snapshot.pivots.supports[0]).abs() < proximity {
        buy_points += 2;
        reasons.push("Price near support S1".to_string());
    }
    if (price - snapshot.pivots.resistances[0]).abs() < proximity {
        sell_points += 2;
        reasons.push("Price near resistance R1".to_string());
    }

    // 5. 决策
    let signal = if buy_points > sell_points && buy_points >= scoring.min_signal_points {
        Direction::Buy
    } else if sell_points > buy_points && sell_points >= scoring.min_signal_points {
        Direction::Sell
    } else {
        Direction::Neutral
    };

    let plan = match signal {
        Direction::Neutral => None,
        _ => {
            if snapshot.atr14 <= 0.0 {
                return Err(AnalysisError::DegenerateInput(
                    "ATR must be positive to derive stop and targets".to_string(),
                ));
            }
            Some(build_plan(signal, price, snapshot, scoring))
        }
    };

    debug!(
        buy_points,
        sell_points,
        ?signal,
        "entry/exit planner scored"
    );

    Ok(TechnicalSignal {
        signal,
        buy_points,
        sell_points,
        reasons,
        plan,
    })
}

/// # Summary
/// 由方向、当前价与枢轴位推导止损与两档止盈。
fn build_plan(
    signal: Direction,
    entry: f64,
    snapshot: &IndicatorSnapshot,
    scoring: &ScoringConfig,
) -> TradePlan {
    let stop_distance = snapshot.atr14 * scoring.stop_atr_multiple;
    match signal {
        Direction::Sell => {
            let stop_loss = entry + stop_distance;
            let take_profit_1 = snapshot.pivots.supports[0];
            let take_profit_2 = snapshot.pivots.supports[1];
            let risk = stop_loss - entry;
            TradePlan {
                entry,
                stop_loss,
                take_profit_1,
                take_profit_2,
                risk,
                reward_risk_1: (entry - take_profit_1) / risk,
                reward_risk_2: (entry - take_profit_2) / risk,
            }
        }
        // Neutral 在调用方已排除
        _ => {
            let stop_loss = entry - stop_distance;
            let take_profit_1 = snapshot.pivots.resistances[0];
            let take_profit_2 = snapshot.pivots.resistances[1];
            let risk = entry - stop_loss;
            TradePlan {
                entry,
                stop_loss,
                take_profit_1,
                take_profit_2,
                risk,
                reward_risk_1: (take_profit_1 - entry) / risk,
                reward_risk_2: (take_profit_2 - entry) / risk,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::pivot_points;
    use kawase_core::analysis::entity::{CandlePattern, PatternKind};

    fn snapshot_with(rsi14: f64, emas: [f64; 3], atr14: f64, price_band: (f64, f64, f64)) -> IndicatorSnapshot {
        let (high, low, close) = price_band;
        IndicatorSnapshot {
            rsi14,
            ema9: emas[0],
            ema21: emas[1],
            ema50: emas[2],
            atr14,
            pivots: pivot_points(high, low, close),
            pattern: CandlePattern {
                kind: PatternKind::None,
                signal: Direction::Neutral,
                strength: 0,
            },
        }
    }

    #[test]
    fn test_buy_signal_with_plan() {
        // RSI 超卖 (+3) 加看多 EMA 堆叠 (+3)：买 6 / 卖 0
        let snap = snapshot_with(25.0, [1.09, 1.08, 1.07], 0.01, (1.20, 1.00, 1.10));
        let price = 1.10;
        let result = plan(&snap, price, &ScoringConfig::default()).expect("plan");
        assert_eq!(result.signal, Direction::Buy);
        assert_eq!(result.buy_points, 6);
        assert_eq!(result.sell_points, 0);

        let plan = result.plan.expect("buy plan");
        assert!((plan.entry - price).abs() < 1e-12);
        assert!((plan.stop_loss - (price - 0.015)).abs() < 1e-12);
        assert!((plan.take_profit_1 - snap.pivots.resistances[0]).abs() < 1e-12);
        assert!((plan.take_profit_2 - snap.pivots.resistances[1]).abs() < 1e-12);
        assert!((plan.reward_risk_1 - (plan.take_profit_1 - price) / plan.risk).abs() < 1e-12);
    }

    #[test]
    fn test_sell_signal_targets_supports() {
        // RSI 超买 (+3) 加看空 EMA 堆叠 (+3)：卖 6 / 买 0
        let snap = snapshot_with(75.0, [1.11, 1.12, 1.13], 0.01, (1.20, 1.00, 1.10));
        let price = 1.10;
        let result = plan(&snap, price, &ScoringConfig::default()).expect("plan");
        assert_eq!(result.signal, Direction::Sell);

        let plan = result.plan.expect("sell plan");
        assert!((plan.stop_loss - (price + 0.015)).abs() < 1e-12);
        assert!((plan.take_profit_1 - snap.pivots.supports[0]).abs() < 1e-12);
        assert!((plan.take_profit_2 - snap.pivots.supports[1]).abs() < 1e-12);
        assert!((plan.risk - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_pattern_strength_counts_for_its_side() {
        let mut snap = snapshot_with(35.0, [1.09, 1.08, 1.07], 0.01, (1.20, 1.00, 1.10));
        snap.pattern = CandlePattern {
            kind: PatternKind::BullishEngulfing,
            signal: Direction::Buy,
            strength: 3,
        };
        // RSI 偏低 (+1) + EMA 堆叠 (+3) + 形态 (+3) = 买 7
        let result = plan(&snap, 1.10, &ScoringConfig::default()).expect("plan");
        assert_eq!(result.buy_points, 7);
        assert_eq!(result.signal, Direction::Buy);
        assert!(result.reasons.iter().any(|r| r.contains("Engulfing")));
    }

    #[test]
    fn test_tie_is_neutral_without_plan() {
        // RSI 中性、EMA 无序、无形态：0 比 0 打平
        let snap = snapshot_with(50.0, [1.10, 1.08, 1.09], 0.01, (1.60, 1.00, 1.30));
        let result = plan(&snap, 1.30, &ScoringConfig::default()).expect("plan");
        assert_eq!(result.signal, Direction::Neutral);
        assert_eq!(result.buy_points, result.sell_points);
        assert!(result.plan.is_none());
    }

    #[test]
    fn test_below_threshold_is_neutral() {
        // 仅看多 EMA 堆叠 (+3)：未达 4 点门槛
        let snap = snapshot_with(50.0, [1.29, 1.28, 1.27], 0.0001, (1.60, 1.00, 1.30));
        let result = plan(&snap, 1.295, &ScoringConfig::default()).expect("plan");
        assert_eq!(result.buy_points, 3);
        assert_eq!(result.signal, Direction::Neutral);
        assert!(result.plan.is_none());
    }

    #[test]
    fn test_zero_atr_rejects_directional_plan() {
        // 买方足 4 点但 ATR 为零：必须报退化输入而不是产出无穷盈亏比
        let snap = snapshot_with(25.0, [1.09, 1.08, 1.07], 0.0, (1.20, 1.00, 1.10));
        let result = plan(&snap, 1.10, &ScoringConfig::default());
        assert!(matches!(result, Err(AnalysisError::DegenerateInput(_))));
    }

    #[test]
    fn test_proximity_to_support_scores_buy() {
        let snap = snapshot_with(50.0, [1.10, 1.08, 1.09], 0.02, (1.20, 1.00, 1.10));
        // 紧贴 S1
        let price = snap.pivots.supports[0] + 0.001;
        let result = plan(&snap, price, &ScoringConfig::default()).expect("plan");
        assert_eq!(result.buy_points, 2);
        assert!(result.reasons.iter().any(|r| r.contains("support")));
    }
}
