use chrono::Utc;
use kawase_core::analysis::entity::{
    ConfidenceTier, DecisionRecord, Direction, ForecastResult, ScoreBreakdown, SentimentResult,
    SignalLabel, TechnicalSignal, VolatilityResult,
};
use kawase_core::common::CurrencyPair;
use kawase_core::config::ScoringConfig;
use tracing::debug;

/// # Summary
/// 回归预测分量的点数映射。置信度不超过最低采信线时一律记 0。
///
/// # Logic
/// 1. 置信度 > 最低采信线才参与计分。
/// 2. 预期变动超过强阈值 ±3 分，超过弱阈值 ±1 分，否则 0 分。
pub fn forecast_points(forecast: &ForecastResult, scoring: &ScoringConfig) -> i32 {
    if forecast.confidence_pct <= scoring.forecast_min_confidence {
        return 0;
    }
    if forecast.expected_change_pct > scoring.forecast_strong_change {
        3
    } else if forecast.expected_change_pct > scoring.forecast_weak_change {
        1
    } else if forecast.expected_change_pct < -scoring.forecast_strong_change {
        -3
    } else if forecast.expected_change_pct < -scoring.forecast_weak_change {
        -1
    } else {
        0
    }
}

/// # Summary
/// 波动率/动量分量的点数映射：动量方向明确且放量时 ±2 分。
pub fn volatility_points(volatility: &VolatilityResult, scoring: &ScoringConfig) -> i32 {
    if volatility.relative_volume > scoring.relative_volume_threshold {
        if volatility.momentum_pct > scoring.momentum_threshold {
            return 2;
        }
        if volatility.momentum_pct < -scoring.momentum_threshold {
            return -2;
        }
    }
    0
}

/// # Summary
/// 情绪分量的带符号点数：标签决定方向，点数决定幅度。
pub fn sentiment_points(sentiment: &SentimentResult) -> i32 {
    match sentiment.label {
        Direction::Buy => sentiment.points,
        Direction::Sell => -sentiment.points,
        Direction::Neutral => 0,
    }
}

/// # Summary
/// 总分到最终标签与置信度分层的映射。
pub fn label_for(total_score: i32) -> (SignalLabel, ConfidenceTier) {
    if total_score >= 5 {
        (SignalLabel::StrongBuy, ConfidenceTier::VeryHigh)
    } else if total_score >= 3 {
        (SignalLabel::Buy, ConfidenceTier::High)
    } else if total_score >= 1 {
        (SignalLabel::WeakBuy, ConfidenceTier::Medium)
    } else if total_score <= -5 {
        (SignalLabel::StrongSell, ConfidenceTier::VeryHigh)
    } else if total_score <= -3 {
        (SignalLabel::Sell, ConfidenceTier::High)
    } else if total_score <= -1 {
        (SignalLabel::WeakSell, ConfidenceTier::Medium)
    } else {
        (SignalLabel::Neutral, ConfidenceTier::Low)
    }
}

/// # Summary
/// 信号聚合器：把回归、波动率与情绪三个分量合成总分与最终标签，
/// 并装配完整的决策记录。
///
/// # Invariants
/// - `total_score` 恒等于三分量之和。
/// - 规划器输出只随记录透传，不计入总分；两套计分是平行通道。
///
/// # Arguments
/// * `pair`: 货币对。
/// * `current_price`: 最新收盘价。
/// * `forecast` / `volatility` / `sentiment`: 三个计分分量。
/// * `technical`: 规划器输出 (平行信号通道)。
/// * `scoring`: 计分策略常量。
///
/// # Returns
/// 返回装配好的决策记录。
pub fn aggregate(
    pair: CurrencyPair,
    current_price: f64,
    forecast: ForecastResult,
    volatility: VolatilityResult,
    sentiment: SentimentResult,
    technical: TechnicalSignal,
    scoring: &ScoringConfig,
) -> DecisionRecord {
    let breakdown = ScoreBreakdown {
        forecast: forecast_points(&forecast, scoring),
        volatility: volatility_points(&volatility, scoring),
        sentiment: sentiment_points(&sentiment),
    };
    let total_score = breakdown.total();
    let (label, confidence) = label_for(total_score);

    debug!(
        %pair,
        forecast_points = breakdown.forecast,
        volatility_points = breakdown.volatility,
        sentiment_points = breakdown.sentiment,
        total_score,
        "aggregated decision"
    );

    DecisionRecord {
        pair,
        time: Utc::now(),
        current_price,
        forecast,
        volatility,
        sentiment,
        technical,
        breakdown,
        total_score,
        label,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kawase_core::analysis::entity::TrendDirection;

    fn forecast_with(change: f64, confidence: f64) -> ForecastResult {
        ForecastResult {
            predicted_price: 1.0,
            expected_change_pct: change,
            trend: if change > 0.0 {
                TrendDirection::Up
            } else {
                TrendDirection::Down
            },
            confidence_pct: confidence,
            slope: 0.0,
        }
    }

    fn volatility_with(momentum: f64, relative_volume: f64) -> VolatilityResult {
        VolatilityResult {
            volatility_pct: 0.5,
            momentum_pct: momentum,
            relative_volume,
        }
    }

    fn sentiment_with(label: Direction, points: i32) -> SentimentResult {
        SentimentResult {
            average_score: 0.0,
            label,
            points,
            article_count: 1,
        }
    }

    fn neutral_technical() -> TechnicalSignal {
        TechnicalSignal {
            signal: Direction::Neutral,
            buy_points: 0,
            sell_points: 0,
            reasons: Vec::new(),
            plan: None,
        }
    }

    #[test]
    fn test_forecast_points_gated_by_confidence() {
        let scoring = ScoringConfig::default();
        // 置信度 70 恰好不采信
        assert_eq!(forecast_points(&forecast_with(0.5, 70.0), &scoring), 0);
        assert_eq!(forecast_points(&forecast_with(0.5, 70.1), &scoring), 3);
        assert_eq!(forecast_points(&forecast_with(0.03, 90.0), &scoring), 1);
        assert_eq!(forecast_points(&forecast_with(-0.5, 90.0), &scoring), -3);
        assert_eq!(forecast_points(&forecast_with(-0.03, 90.0), &scoring), -1);
        assert_eq!(forecast_points(&forecast_with(0.01, 90.0), &scoring), 0);
    }

    #[test]
    fn test_volatility_points_require_volume_confirmation() {
        let scoring = ScoringConfig::default();
        assert_eq!(volatility_points(&volatility_with(0.5, 1.5), &scoring), 2);
        assert_eq!(volatility_points(&volatility_with(-0.5, 1.5), &scoring), -2);
        // 动量够但未放量
        assert_eq!(volatility_points(&volatility_with(0.5, 1.0), &scoring), 0);
        // 放量但动量平淡
        assert_eq!(volatility_points(&volatility_with(0.05, 1.5), &scoring), 0);
    }

    #[test]
    fn test_sentiment_points_signed_by_label() {
        assert_eq!(sentiment_points(&sentiment_with(Direction::Buy, 3)), 3);
        assert_eq!(sentiment_points(&sentiment_with(Direction::Sell, 3)), -3);
        assert_eq!(sentiment_points(&sentiment_with(Direction::Neutral, 0)), 0);
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(label_for(8), (SignalLabel::StrongBuy, ConfidenceTier::VeryHigh));
        assert_eq!(label_for(5), (SignalLabel::StrongBuy, ConfidenceTier::VeryHigh));
        assert_eq!(label_for(3), (SignalLabel::Buy, ConfidenceTier::High));
        assert_eq!(label_for(1), (SignalLabel::WeakBuy, ConfidenceTier::Medium));
        assert_eq!(label_for(0), (SignalLabel::Neutral, ConfidenceTier::Low));
        assert_eq!(label_for(-1), (SignalLabel::WeakSell, ConfidenceTier::Medium));
        assert_eq!(label_for(-3), (SignalLabel::Sell, ConfidenceTier::High));
        assert_eq!(label_for(-5), (SignalLabel::StrongSell, ConfidenceTier::VeryHigh));
    }

    #[test]
    fn test_total_is_exact_sum_of_components() {
        let scoring = ScoringConfig::default();
        let record = aggregate(
            CurrencyPair::new("USD", "JPY"),
            150.0,
            forecast_with(0.5, 90.0),
            volatility_with(0.5, 1.5),
            sentiment_with(Direction::Sell, 1),
            neutral_technical(),
            &scoring,
        );
        assert_eq!(record.breakdown.forecast, 3);
        assert_eq!(record.breakdown.volatility, 2);
        assert_eq!(record.breakdown.sentiment, -1);
        assert_eq!(record.total_score, 4);
        assert_eq!(record.label, SignalLabel::Buy);
    }

    #[test]
    fn test_total_independent_of_planner_output() {
        let scoring = ScoringConfig::default();
        // 规划器一边倒的高分不得影响聚合总分
        let loaded_technical = TechnicalSignal {
            signal: Direction::Buy,
            buy_points: 10,
            sell_points: 0,
            reasons: vec!["Bullish EMA alignment".to_string()],
            plan: None,
        };
        let base = aggregate(
            CurrencyPair::new("EUR", "USD"),
            1.1,
            forecast_with(0.0, 0.0),
            volatility_with(0.0, 0.0),
            sentiment_with(Direction::Neutral, 0),
            neutral_technical(),
            &scoring,
        );
        let loaded = aggregate(
            CurrencyPair::new("EUR", "USD"),
            1.1,
            forecast_with(0.0, 0.0),
            volatility_with(0.0, 0.0),
            sentiment_with(Direction::Neutral, 0),
            loaded_technical,
            &scoring,
        );
        assert_eq!(base.total_score, 0);
        assert_eq!(loaded.total_score, 0);
        assert_eq!(loaded.label, SignalLabel::Neutral);
        assert_eq!(loaded.confidence, ConfidenceTier::Low);
    }
}
