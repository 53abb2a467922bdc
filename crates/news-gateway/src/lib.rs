use advisor_core::{NewsItem, Sentiment};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use ml_client::SentimentClient;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://newsapi.org/v2/everything";

/// NewsAPI gateway. Fetches recent articles for a symbol or the general
/// market and annotates each one with a classifier sentiment. Best-effort:
/// a failed fetch yields an empty list, a failed classification yields a
/// neutral sentiment for that item.
#[derive(Clone)]
pub struct NewsGateway {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
    sentiment: SentimentClient,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
}

impl NewsGateway {
    pub fn new(api_key: String, sentiment: SentimentClient) -> Self {
        Self::with_base_url(api_key, sentiment, BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, sentiment: SentimentClient, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key,
            client,
            base_url,
            sentiment,
        }
    }

    /// Fetch articles from the last `days` days. `symbol` narrows the query
    /// to one instrument; otherwise the general market query is used.
    pub async fn fetch_news(&self, symbol: Option<&str>, days: i64) -> Vec<NewsItem> {
        let end = Utc::now();
        let start = end - ChronoDuration::days(days.max(0));

        let query = match symbol {
            Some(sym) => format!("{} stock", sym),
            None => "stock market OR cryptocurrency".to_string(),
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query.as_str()),
                ("from", &start.format("%Y-%m-%d").to_string()),
                ("to", &end.format("%Y-%m-%d").to_string()),
                ("language", "tr"),
                ("sortBy", "relevancy"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("News request failed: {}", e);
                return Vec::new();
            }
        };

        let body = match response.json::<NewsApiResponse>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Malformed news response: {}", e);
                return Vec::new();
            }
        };

        if body.status != "ok" {
            tracing::warn!("News API returned status {:?}", body.status);
            return Vec::new();
        }

        // Classify one article at a time; the classifier service handles a
        // single text per request.
        let mut items = Vec::with_capacity(body.articles.len());
        for article in body.articles {
            let Some(item) = self.annotate(article).await else {
                continue;
            };
            items.push(item);
        }

        items
    }

    async fn annotate(&self, article: NewsApiArticle) -> Option<NewsItem> {
        let title = article.title?;
        let url = article.url?;
        let published_at = article.published_at.unwrap_or_else(Utc::now);

        let text = match &article.description {
            Some(desc) => format!("{} {}", title, desc),
            None => title.clone(),
        };

        let sentiment = match self.sentiment.classify(&text).await {
            Ok(sentiment) => sentiment,
            Err(e) => {
                tracing::warn!("Sentiment classification failed: {}", e);
                Sentiment::neutral()
            }
        };

        Some(NewsItem {
            title,
            description: article.description,
            url,
            published_at,
            sentiment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_news_api_payload() {
        let raw = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "title": "THYAO rekor kırdı",
                    "description": "Hisse yüzde 5 yükseldi",
                    "url": "https://example.com/a",
                    "publishedAt": "2026-08-04T09:30:00Z"
                },
                {
                    "title": "Piyasalarda kayıp",
                    "description": null,
                    "url": "https://example.com/b",
                    "publishedAt": "2026-08-03T18:00:00Z"
                }
            ]
        }"#;

        let body: NewsApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.articles.len(), 2);
        assert_eq!(body.articles[0].title.as_deref(), Some("THYAO rekor kırdı"));
        assert!(body.articles[1].description.is_none());
    }

    #[test]
    fn error_status_carries_no_articles() {
        let raw = r#"{"status": "error", "code": "apiKeyInvalid", "message": "bad key"}"#;
        let body: NewsApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.status, "error");
        assert!(body.articles.is_empty());
    }
}
