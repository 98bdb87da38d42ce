use kawase_core::analysis::entity::{DecisionRecord, Direction};
use kawase_core::analysis::port::AnalysisEvent;

/// # Summary
/// Renders a full decision record as a multi-line plain-text report.
///
/// # Invariants
/// * Output is plain text, safe for both terminals and Telegram Markdown bodies.
///
/// # Arguments
/// * `record` - The decision record to render.
///
/// # Returns
/// * The formatted report.
pub fn render_record(record: &DecisionRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} @ {:.5} ({})\n",
        record.pair,
        record.current_price,
        record.time.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push_str(&format!(
        "Signal: {} (score {:+}, confidence {:?})\n",
        record.label, record.total_score, record.confidence
    ));
    out.push_str(&format!(
        "  Forecast   {:+} | predicted {:.5} ({:+.2}%), confidence {:.1}%\n",
        record.breakdown.forecast,
        record.forecast.predicted_price,
        record.forecast.expected_change_pct,
        record.forecast.confidence_pct
    ));
    out.push_str(&format!(
        "  Volatility {:+} | vol {:.2}%, momentum {:+.2}%, rel volume {:.2}\n",
        record.breakdown.volatility,
        record.volatility.volatility_pct,
        record.volatility.momentum_pct,
        record.volatility.relative_volume
    ));
    out.push_str(&format!(
        "  Sentiment  {:+} | avg {:+.2} over {} articles\n",
        record.breakdown.sentiment,
        record.sentiment.average_score,
        record.sentiment.article_count
    ));
    out.push_str(&format!(
        "Technical: {} ({} buy / {} sell)\n",
        direction_text(record.technical.signal),
        record.technical.buy_points,
        record.technical.sell_points
    ));
    for reason in &record.technical.reasons {
        out.push_str(&format!("  - {}\n", reason));
    }
    if let Some(plan) = &record.technical.plan {
        out.push_str(&format!(
            "Plan: entry {:.5}, stop {:.5}, TP1 {:.5}, TP2 {:.5} (R:R {:.2} / {:.2})\n",
            plan.entry,
            plan.stop_loss,
            plan.take_profit_1,
            plan.take_profit_2,
            plan.reward_risk_1,
            plan.reward_risk_2
        ));
    }
    out
}

/// # Summary
/// Renders any analysis event as a `(subject, body)` pair.
///
/// # Arguments
/// * `event` - The event to render.
///
/// # Returns
/// * A subject line and a plain-text body.
pub fn render_event(event: &AnalysisEvent) -> (String, String) {
    match event {
        AnalysisEvent::Decision { revision, record } => (
            format!("{} cycle #{}: {}", record.pair, revision, record.label),
            render_record(record),
        ),
        AnalysisEvent::StrongSignal { record } => (
            format!("STRONG ALERT {}: {}", record.pair, record.label),
            render_record(record),
        ),
        AnalysisEvent::SignalFlip {
            pair,
            previous,
            current,
        } => (
            format!("{} signal flip", pair),
            format!("Signal changed: {} -> {}\n", previous, current),
        ),
    }
}

fn direction_text(direction: Direction) -> &'static str {
    match direction {
        Direction::Buy => "BUY",
        Direction::Sell => "SELL",
        Direction::Neutral => "NEUTRAL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kawase_core::analysis::entity::{
        ConfidenceTier, ForecastResult, ScoreBreakdown, SentimentResult, SignalLabel,
        TechnicalSignal, TradePlan, TrendDirection, VolatilityResult,
    };
    use kawase_core::common::CurrencyPair;

    fn sample_record() -> DecisionRecord {
        DecisionRecord {
            pair: CurrencyPair::new("USD", "JPY"),
            time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap(),
            current_price: 155.123,
            forecast: ForecastResult {
                predicted_price: 155.9,
                expected_change_pct: 0.5,
                trend: TrendDirection::Up,
                confidence_pct: 92.0,
                slope: 0.01,
            },
            volatility: VolatilityResult {
                volatility_pct: 0.35,
                momentum_pct: 1.2,
                relative_volume: 2.3,
            },
            sentiment: SentimentResult {
                average_score: 0.2,
                label: Direction::Buy,
                points: 3,
                article_count: 4,
            },
            technical: TechnicalSignal {
                signal: Direction::Buy,
                buy_points: 5,
                sell_points: 0,
                reasons: vec!["Bullish EMA alignment".to_string()],
                plan: Some(TradePlan {
                    entry: 155.123,
                    stop_loss: 154.8,
                    take_profit_1: 155.6,
                    take_profit_2: 156.0,
                    risk: 0.323,
                    reward_risk_1: 1.48,
                    reward_risk_2: 2.71,
                }),
            },
            breakdown: ScoreBreakdown {
                forecast: 3,
                volatility: 2,
                sentiment: 3,
            },
            total_score: 8,
            label: SignalLabel::StrongBuy,
            confidence: ConfidenceTier::VeryHigh,
        }
    }

    #[test]
    fn test_render_record_contains_all_sections() {
        let report = render_record(&sample_record());
        assert!(report.contains("USD/JPY @ 155.12300"));
        assert!(report.contains("Signal: STRONG BUY (score +8"));
        assert!(report.contains("Forecast   +3"));
        assert!(report.contains("Volatility +2"));
        assert!(report.contains("Sentiment  +3"));
        assert!(report.contains("Technical: BUY (5 buy / 0 sell)"));
        assert!(report.contains("- Bullish EMA alignment"));
        assert!(report.contains("Plan: entry 155.12300, stop 154.80000"));
    }

    #[test]
    fn test_render_event_subjects() {
        let record = sample_record();
        let (subject, _) = render_event(&AnalysisEvent::Decision {
            revision: 7,
            record: record.clone(),
        });
        assert_eq!(subject, "USD/JPY cycle #7: STRONG BUY");

        let (subject, _) = render_event(&AnalysisEvent::StrongSignal { record });
        assert_eq!(subject, "STRONG ALERT USD/JPY: STRONG BUY");

        let (subject, body) = render_event(&AnalysisEvent::SignalFlip {
            pair: CurrencyPair::new("EUR", "USD"),
            previous: SignalLabel::Buy,
            current: SignalLabel::Sell,
        });
        assert_eq!(subject, "EUR/USD signal flip");
        assert!(body.contains("BUY -> SELL"));
    }
}
