pub mod intent;

pub use intent::{classify, extract_symbol, Intent};

use advice_engine::PositionContext;
use advisor_core::{Advice, ChatGenerator, NewsItem, SentimentSummary, TrendResult};
use news_gateway::NewsGateway;
use portfolio_store::Store;
use std::sync::Arc;
use trend_model::TrendAnalyzer;

/// System persona for the conversational model
pub const PERSONA: &str = "Sen Fintelli'nin yapay zeka destekli finansal asistanısın. \
Görevin kullanıcılara finansal piyasalar, yatırımlar ve portföy yönetimi konusunda \
yardımcı olmak. Her zaman nazik, profesyonel ve bilgilendirici ol. Belirsizlik \
durumunda daha fazla bilgi iste. Asla kesin yatırım tavsiyesi verme, bunun yerine \
analiz ve önerilerde bulun.";

const APOLOGY: &str =
    "Üzgünüm, şu anda yanıt üretirken bir sorun oluştu. Lütfen tekrar deneyin.";
const ASK_SYMBOL: &str =
    "Hangi hisse senedi veya kripto para hakkında bilgi almak istersiniz?";
const ASK_PORTFOLIO_DETAIL: &str =
    "Portföyünüz hakkında daha spesifik bilgi verebilir misiniz?";
const NO_NEWS: &str = "Haber bulunamadı.";

const NEWS_QUERY_DAYS: i64 = 1;
const ADVICE_NEWS_DAYS: i64 = 1;
const MAX_NEWS_SHOWN: usize = 5;

/// Routes user messages to the structured handlers or the conversational
/// model. All services are injected; the engine itself is stateless.
#[derive(Clone)]
pub struct ChatEngine {
    store: Store,
    trend: TrendAnalyzer,
    news: NewsGateway,
    generator: Arc<dyn ChatGenerator>,
}

impl ChatEngine {
    pub fn new(
        store: Store,
        trend: TrendAnalyzer,
        news: NewsGateway,
        generator: Arc<dyn ChatGenerator>,
    ) -> Self {
        Self {
            store,
            trend,
            news,
            generator,
        }
    }

    /// Answer a user message. Never fails: every internal fault degrades to
    /// the stock apology string.
    pub async fn respond(&self, user_id: i64, message: &str, context: &[String]) -> String {
        match classify(message) {
            Intent::MarketAnalysis => self.handle_market_analysis(message).await,
            Intent::PortfolioAdvice => self.handle_portfolio_advice(user_id, message).await,
            Intent::NewsQuery => self.handle_news_query(message).await,
            Intent::General => self.handle_general(message, context).await,
        }
    }

    pub async fn handle_market_analysis(&self, message: &str) -> String {
        let Some(symbol) = extract_symbol(message) else {
            return ASK_SYMBOL.to_string();
        };

        let trend = self.analyze_symbol(&symbol).await;
        format_market_analysis(&symbol, trend.as_ref())
    }

    pub async fn handle_portfolio_advice(&self, user_id: i64, message: &str) -> String {
        let Some(symbol) = extract_symbol(message) else {
            return ASK_PORTFOLIO_DETAIL.to_string();
        };

        // Analysis unavailable reads as "tell me more", not as an error
        let Some(trend) = self.analyze_symbol(&symbol).await else {
            return ASK_PORTFOLIO_DETAIL.to_string();
        };

        let holding = match self.store.get_holding(user_id, &symbol).await {
            Ok(holding) => holding,
            Err(e) => {
                tracing::warn!("Holding lookup failed for user {}: {}", user_id, e);
                None
            }
        };
        let position = holding.map(|h| PositionContext {
            quantity: h.quantity,
        });

        let items = self.news.fetch_news(Some(&symbol), ADVICE_NEWS_DAYS).await;
        let sentiment = SentimentSummary::from_items(&items);

        let advice = advice_engine::synthesize(&trend, position.as_ref(), &sentiment);
        format_advice(&symbol, &advice)
    }

    pub async fn handle_news_query(&self, message: &str) -> String {
        let symbol = extract_symbol(message);
        let items = self
            .news
            .fetch_news(symbol.as_deref(), NEWS_QUERY_DAYS)
            .await;

        format_news(symbol.as_deref(), &items)
    }

    async fn handle_general(&self, message: &str, context: &[String]) -> String {
        match self.generator.generate(PERSONA, context, message).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Chat generation failed: {}", e);
                APOLOGY.to_string()
            }
        }
    }

    /// Trend analysis over the stored price history for a symbol
    async fn analyze_symbol(&self, symbol: &str) -> Option<TrendResult> {
        let history = match self
            .store
            .price_history(symbol, self.trend.window() as i64)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Price history lookup failed for {}: {}", symbol, e);
                return None;
            }
        };

        self.trend.predict_trend(symbol, &history).await
    }
}

/// Market analysis block, matching the assistant's Turkish response shape
pub fn format_market_analysis(symbol: &str, trend: Option<&TrendResult>) -> String {
    let mut response = format!("{} için piyasa analizi:\n", symbol);

    match trend {
        Some(result) => {
            response.push_str(&format!("Trend: {}\n", result.trend.as_str()));
            response.push_str(&format!(
                "Güven Seviyesi: %{:.2}\n",
                result.confidence * 100.0
            ));
            if let Some(prediction) = result.prediction {
                response.push_str(&format!("Tahmin Edilen Fiyat: {:.2}\n", prediction));
            }
        }
        None => response.push_str("Analiz şu anda kullanılamıyor.\n"),
    }

    response
}

pub fn format_advice(symbol: &str, advice: &Advice) -> String {
    format!(
        "{} için yatırım analizi:\nÖnerilen Aksiyon: {}\nGerekçe: {}\nRisk Seviyesi: {}",
        symbol,
        advice.action.as_str(),
        advice.reasoning,
        advice.risk_level.as_str()
    )
}

pub fn format_news(symbol: Option<&str>, items: &[NewsItem]) -> String {
    if items.is_empty() {
        return NO_NEWS.to_string();
    }

    let mut response = match symbol {
        Some(sym) => format!("{} haberleri:\n", sym),
        None => "Genel piyasa haberleri:\n".to_string(),
    };

    for item in items.iter().take(MAX_NEWS_SHOWN) {
        response.push_str(&format!(
            "• {} [{}]\n{}\n",
            item.title,
            item.sentiment.label.as_str(),
            item.url
        ));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Sentiment, SentimentLabel, TrendDirection};
    use chrono::Utc;

    #[test]
    fn market_analysis_block_lists_trend_fields() {
        let trend = TrendResult {
            trend: TrendDirection::Up,
            confidence: 0.1234,
            prediction: Some(284.5),
        };

        let text = format_market_analysis("THYAO", Some(&trend));
        assert!(text.contains("THYAO için piyasa analizi"));
        assert!(text.contains("Trend: UP"));
        assert!(text.contains("Güven Seviyesi: %12.34"));
        assert!(text.contains("Tahmin Edilen Fiyat: 284.50"));
    }

    #[test]
    fn market_analysis_block_without_prediction_omits_price_line() {
        let sentinel = TrendResult::insufficient_history();
        let text = format_market_analysis("XYZ", Some(&sentinel));
        assert!(text.contains("Trend: NEUTRAL"));
        assert!(!text.contains("Tahmin Edilen Fiyat"));
    }

    #[test]
    fn unavailable_analysis_degrades_softly() {
        let text = format_market_analysis("XYZ", None);
        assert!(text.contains("kullanılamıyor"));
    }

    #[test]
    fn news_block_caps_at_five_items() {
        let items: Vec<NewsItem> = (0..8)
            .map(|i| NewsItem {
                title: format!("Başlık {}", i),
                description: None,
                url: format!("https://example.com/{}", i),
                published_at: Utc::now(),
                sentiment: Sentiment {
                    label: SentimentLabel::Positive,
                    score: 0.9,
                },
            })
            .collect();

        let text = format_news(Some("THYAO"), &items);
        assert!(text.contains("Başlık 4"));
        assert!(!text.contains("Başlık 5"));
    }

    #[test]
    fn empty_news_yields_not_found_message() {
        assert_eq!(format_news(None, &[]), NO_NEWS);
    }
}
