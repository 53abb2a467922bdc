use advisor_core::Quote;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage quote gateway. Single-attempt, best-effort: any transport or
/// parse failure is logged and collapses to `None`.
#[derive(Clone)]
pub struct AlphaVantageClient {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    exchange_rate: Option<ExchangeRate>,
}

#[derive(Debug, Deserialize)]
struct ExchangeRate {
    #[serde(rename = "5. Exchange Rate")]
    rate: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key,
            client,
            base_url,
        }
    }

    /// Fetch a spot quote: stock endpoint first, crypto exchange rate as the
    /// fallback for symbols the equity endpoint does not know.
    pub async fn fetch_quote(&self, symbol: &str) -> Option<Quote> {
        if let Some(quote) = self.fetch_stock_quote(symbol).await {
            return Some(quote);
        }
        self.fetch_crypto_quote(symbol).await
    }

    /// Fetch an equity quote via GLOBAL_QUOTE
    pub async fn fetch_stock_quote(&self, symbol: &str) -> Option<Quote> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("Quote request failed for {}: {}", symbol, e);
                return None;
            }
        };

        let body = match response.json::<GlobalQuoteResponse>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Malformed quote response for {}: {}", symbol, e);
                return None;
            }
        };

        let quote = body.global_quote?;
        let price = parse_field(&quote.price, symbol, "price")?;
        let volume = quote
            .volume
            .as_deref()
            .and_then(|v| parse_field(v, symbol, "volume"));

        Some(Quote {
            symbol: symbol.to_string(),
            price,
            volume,
            timestamp: Utc::now(),
        })
    }

    /// Fetch a crypto quote as a USD exchange rate
    pub async fn fetch_crypto_quote(&self, symbol: &str) -> Option<Quote> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", symbol),
                ("to_currency", "USD"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("Exchange rate request failed for {}: {}", symbol, e);
                return None;
            }
        };

        let body = match response.json::<ExchangeRateResponse>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Malformed exchange rate response for {}: {}", symbol, e);
                return None;
            }
        };

        let rate = body.exchange_rate?;
        let price = parse_field(&rate.rate, symbol, "exchange rate")?;

        Some(Quote {
            symbol: symbol.to_string(),
            price,
            volume: None,
            timestamp: Utc::now(),
        })
    }
}

/// Alpha Vantage serves numbers as strings ("05. price": "123.4500")
fn parse_field(raw: &str, symbol: &str, field: &str) -> Option<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            tracing::warn!("Unparseable {} for {}: {:?}", field, symbol, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_quote_payload() {
        let raw = r#"{
            "Global Quote": {
                "01. symbol": "THYAO",
                "05. price": "284.5000",
                "06. volume": "10543210",
                "07. latest trading day": "2026-08-04"
            }
        }"#;

        let body: GlobalQuoteResponse = serde_json::from_str(raw).unwrap();
        let quote = body.global_quote.unwrap();
        assert_eq!(parse_field(&quote.price, "THYAO", "price"), Some(284.5));
        assert_eq!(
            quote.volume.as_deref().and_then(|v| parse_field(v, "THYAO", "volume")),
            Some(10_543_210.0)
        );
    }

    #[test]
    fn missing_quote_block_yields_none() {
        // Rate-limit replies carry a "Note" instead of a quote block
        let raw = r#"{"Note": "Thank you for using Alpha Vantage!"}"#;
        let body: GlobalQuoteResponse = serde_json::from_str(raw).unwrap();
        assert!(body.global_quote.is_none());
    }

    #[test]
    fn parses_exchange_rate_payload() {
        let raw = r#"{
            "Realtime Currency Exchange Rate": {
                "1. From_Currency Code": "BTC",
                "5. Exchange Rate": "64250.13000000"
            }
        }"#;

        let body: ExchangeRateResponse = serde_json::from_str(raw).unwrap();
        let rate = body.exchange_rate.unwrap();
        assert_eq!(parse_field(&rate.rate, "BTC", "exchange rate"), Some(64250.13));
    }

    #[test]
    fn garbage_numeric_fields_yield_none() {
        assert_eq!(parse_field("n/a", "XYZ", "price"), None);
        assert_eq!(parse_field("", "XYZ", "price"), None);
    }
}
