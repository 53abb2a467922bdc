use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    pub created_at: Option<String>,
}

/// A user's position in a symbol
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Holding {
    pub id: Option<i64>,
    pub user_id: i64,
    /// "stock" or "crypto"
    pub asset_type: String,
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: f64,
}

/// Stored price observation; the trend window reads these back
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MarketSnapshot {
    pub id: Option<i64>,
    pub symbol: String,
    pub price: f64,
    pub timestamp: Option<String>,
    pub volume: Option<f64>,
}

/// One recorded chat turn (user message + assistant response)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatRecord {
    pub id: Option<i64>,
    pub user_id: i64,
    pub message: String,
    pub response: String,
    pub created_at: Option<String>,
}

/// Holding decorated with a live quote for the portfolio endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedHolding {
    pub symbol: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: Option<f64>,
    pub profit_loss: Option<f64>,
}

impl EnrichedHolding {
    pub fn from_holding(holding: &Holding, current_price: Option<f64>) -> Self {
        let profit_loss =
            current_price.map(|price| (price - holding.purchase_price) * holding.quantity);

        Self {
            symbol: holding.symbol.clone(),
            asset_type: holding.asset_type.clone(),
            quantity: holding.quantity,
            purchase_price: holding.purchase_price,
            current_price,
            profit_loss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrichment_computes_profit_loss() {
        let holding = Holding {
            id: Some(1),
            user_id: 7,
            asset_type: "stock".to_string(),
            symbol: "THYAO".to_string(),
            quantity: 10.0,
            purchase_price: 250.0,
        };

        let enriched = EnrichedHolding::from_holding(&holding, Some(284.5));
        assert_eq!(enriched.profit_loss, Some(345.0));

        let unpriced = EnrichedHolding::from_holding(&holding, None);
        assert!(unpriced.profit_loss.is_none());
    }
}
