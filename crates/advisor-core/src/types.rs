use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Spot quote for a stock or crypto symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Sentiment polarity label attached to a news item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }

    /// Direction sign used when folding item scores into an aggregate
    pub fn sign(&self) -> f64 {
        match self {
            SentimentLabel::Positive => 1.0,
            SentimentLabel::Negative => -1.0,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

/// Classifier output for a single text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Classifier confidence in [0, 1]
    pub score: f64,
}

impl Sentiment {
    /// Fallback when the classifier is unavailable
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.5,
        }
    }
}

/// News article annotated with sentiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub sentiment: Sentiment,
}

/// Aggregate news mood over a batch of annotated items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Mean of label-signed scores, in [-1, 1]
    pub polarity: f64,
    pub article_count: usize,
}

impl SentimentSummary {
    pub fn from_items(items: &[NewsItem]) -> Self {
        if items.is_empty() {
            return Self {
                polarity: 0.0,
                article_count: 0,
            };
        }

        let total: f64 = items
            .iter()
            .map(|item| item.sentiment.label.sign() * item.sentiment.score)
            .sum();

        Self {
            polarity: (total / items.len() as f64).clamp(-1.0, 1.0),
            article_count: items.len(),
        }
    }
}

/// Directional price movement classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "UP",
            TrendDirection::Down => "DOWN",
            TrendDirection::Neutral => "NEUTRAL",
        }
    }
}

/// Output of the trend model over a price-history window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: TrendDirection,
    /// Normalized magnitude of predicted-vs-last delta, clamped to [0, 1]
    pub confidence: f64,
    pub prediction: Option<f64>,
}

impl TrendResult {
    /// Low-confidence fallback for windows with too little history.
    /// Not an error: callers render it as a neutral outlook.
    pub fn insufficient_history() -> Self {
        Self {
            trend: TrendDirection::Neutral,
            confidence: 0.5,
            prediction: None,
        }
    }
}

/// Recommended action for a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdviceAction {
    Buy,
    Sell,
    Hold,
    Watch,
}

impl AdviceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceAction::Buy => "BUY",
            AdviceAction::Sell => "SELL",
            AdviceAction::Hold => "HOLD",
            AdviceAction::Watch => "WATCH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Synthesized recommendation with rationale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advice {
    pub action: AdviceAction,
    pub reasoning: String,
    pub risk_level: RiskLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(label: SentimentLabel, score: f64) -> NewsItem {
        NewsItem {
            title: "t".to_string(),
            description: None,
            url: "https://example.com".to_string(),
            published_at: Utc::now(),
            sentiment: Sentiment { label, score },
        }
    }

    #[test]
    fn summary_of_empty_batch_is_flat() {
        let summary = SentimentSummary::from_items(&[]);
        assert_eq!(summary.polarity, 0.0);
        assert_eq!(summary.article_count, 0);
    }

    #[test]
    fn summary_mixes_signed_scores() {
        let items = vec![
            item(SentimentLabel::Positive, 0.9),
            item(SentimentLabel::Negative, 0.3),
            item(SentimentLabel::Neutral, 0.8),
        ];
        let summary = SentimentSummary::from_items(&items);
        assert_eq!(summary.article_count, 3);
        assert!((summary.polarity - 0.2).abs() < 1e-9);
    }

    #[test]
    fn summary_polarity_stays_bounded() {
        let items = vec![item(SentimentLabel::Positive, 1.0); 4];
        let summary = SentimentSummary::from_items(&items);
        assert!(summary.polarity <= 1.0);
    }
}
