use advisor_core::{
    Advice, AdviceAction, RiskLevel, SentimentSummary, TrendDirection, TrendResult,
};

/// Conviction score weights. The trend model sees a 60-day window while the
/// sentiment summary reflects a single day of headlines, so trend dominates.
const TREND_WEIGHT: f64 = 0.7;
const SENTIMENT_WEIGHT: f64 = 0.3;

/// Score thresholds for the action table.
const STRONG_SIGNAL: f64 = 0.45;
const LEAN_SIGNAL: f64 = 0.15;

/// Risk thresholds.
const AGREEMENT_MARGIN: f64 = 0.05;
const LOW_RISK_CONFIDENCE: f64 = 0.6;
const HIGH_RISK_CONFIDENCE: f64 = 0.3;

/// Position state as seen by the synthesizer: quantity of the symbol the
/// user already holds, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionContext {
    pub quantity: f64,
}

impl PositionContext {
    pub fn held(&self) -> bool {
        self.quantity > 0.0
    }
}

/// Combine trend, existing position and news mood into a recommendation.
///
/// Pure function of its inputs. The conviction score is
/// `0.7 * signed_trend + 0.3 * polarity` where `signed_trend` is the model
/// confidence signed by direction; thresholds are documented in DESIGN.md.
pub fn synthesize(
    trend: &TrendResult,
    position: Option<&PositionContext>,
    sentiment: &SentimentSummary,
) -> Advice {
    let signed_trend = match trend.trend {
        TrendDirection::Up => trend.confidence,
        TrendDirection::Down => -trend.confidence,
        TrendDirection::Neutral => 0.0,
    };

    let score = TREND_WEIGHT * signed_trend + SENTIMENT_WEIGHT * sentiment.polarity;
    let held = position.map(PositionContext::held).unwrap_or(false);

    let action = if score >= STRONG_SIGNAL {
        // Already positioned: let the position ride instead of adding
        if held {
            AdviceAction::Hold
        } else {
            AdviceAction::Buy
        }
    } else if score <= -STRONG_SIGNAL {
        if held {
            AdviceAction::Sell
        } else {
            AdviceAction::Watch
        }
    } else if score >= LEAN_SIGNAL {
        if held {
            AdviceAction::Hold
        } else {
            AdviceAction::Buy
        }
    } else if held {
        AdviceAction::Hold
    } else {
        AdviceAction::Watch
    };

    let agreement = signed_trend * sentiment.polarity;
    let risk_level = if agreement < -AGREEMENT_MARGIN || trend.confidence < HIGH_RISK_CONFIDENCE {
        RiskLevel::High
    } else if agreement > AGREEMENT_MARGIN && trend.confidence >= LOW_RISK_CONFIDENCE {
        RiskLevel::Low
    } else {
        RiskLevel::Medium
    };

    Advice {
        action,
        reasoning: build_reasoning(trend, sentiment),
        risk_level,
    }
}

fn build_reasoning(trend: &TrendResult, sentiment: &SentimentSummary) -> String {
    let trend_text = match trend.trend {
        TrendDirection::Up => "yükseliş",
        TrendDirection::Down => "düşüş",
        TrendDirection::Neutral => "yatay seyir",
    };

    let mood = if sentiment.article_count == 0 {
        "haber akışı zayıf".to_string()
    } else if sentiment.polarity > 0.1 {
        format!("{} haberin genel tonu olumlu", sentiment.article_count)
    } else if sentiment.polarity < -0.1 {
        format!("{} haberin genel tonu olumsuz", sentiment.article_count)
    } else {
        format!("{} haberin genel tonu nötr", sentiment.article_count)
    };

    format!(
        "Model %{:.0} güvenle {} bekliyor; {}.",
        trend.confidence * 100.0,
        trend_text,
        mood
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::TrendDirection;

    fn trend(direction: TrendDirection, confidence: f64) -> TrendResult {
        TrendResult {
            trend: direction,
            confidence,
            prediction: Some(100.0),
        }
    }

    fn mood(polarity: f64) -> SentimentSummary {
        SentimentSummary {
            polarity,
            article_count: 5,
        }
    }

    const HELD: PositionContext = PositionContext { quantity: 10.0 };

    #[test]
    fn strong_uptrend_without_position_is_buy() {
        let advice = synthesize(&trend(TrendDirection::Up, 0.8), None, &mood(0.4));
        assert_eq!(advice.action, AdviceAction::Buy);
        assert_eq!(advice.risk_level, RiskLevel::Low);
    }

    #[test]
    fn strong_uptrend_with_position_rides_as_hold() {
        let advice = synthesize(&trend(TrendDirection::Up, 0.8), Some(&HELD), &mood(0.4));
        assert_eq!(advice.action, AdviceAction::Hold);
    }

    #[test]
    fn strong_downtrend_with_position_is_sell() {
        let advice = synthesize(&trend(TrendDirection::Down, 0.9), Some(&HELD), &mood(-0.5));
        assert_eq!(advice.action, AdviceAction::Sell);
        assert_eq!(advice.risk_level, RiskLevel::Low);
    }

    #[test]
    fn downtrend_without_position_never_recommends_buy() {
        // Directional consistency across the full sentiment range
        for polarity in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let advice = synthesize(&trend(TrendDirection::Down, 0.8), None, &mood(polarity));
            assert_ne!(advice.action, AdviceAction::Buy, "polarity {}", polarity);
        }
    }

    #[test]
    fn neutral_trend_without_position_is_watch() {
        let advice = synthesize(&trend(TrendDirection::Neutral, 0.5), None, &mood(0.0));
        assert_eq!(advice.action, AdviceAction::Watch);
    }

    #[test]
    fn neutral_trend_with_position_is_hold() {
        let advice = synthesize(&trend(TrendDirection::Neutral, 0.5), Some(&HELD), &mood(0.0));
        assert_eq!(advice.action, AdviceAction::Hold);
    }

    #[test]
    fn disagreement_between_trend_and_news_raises_risk() {
        let advice = synthesize(&trend(TrendDirection::Up, 0.7), None, &mood(-0.6));
        assert_eq!(advice.risk_level, RiskLevel::High);
    }

    #[test]
    fn weak_confidence_raises_risk() {
        let advice = synthesize(&trend(TrendDirection::Up, 0.2), None, &mood(0.3));
        assert_eq!(advice.risk_level, RiskLevel::High);
    }

    #[test]
    fn lean_positive_signal_buys_when_flat() {
        // score = 0.7*0.3 + 0.3*0.2 = 0.27
        let advice = synthesize(&trend(TrendDirection::Up, 0.3), None, &mood(0.2));
        assert_eq!(advice.action, AdviceAction::Buy);
    }

    #[test]
    fn reasoning_mentions_trend_and_news() {
        let advice = synthesize(&trend(TrendDirection::Up, 0.8), None, &mood(0.4));
        assert!(advice.reasoning.contains("yükseliş"));
        assert!(advice.reasoning.contains("olumlu"));
    }
}
