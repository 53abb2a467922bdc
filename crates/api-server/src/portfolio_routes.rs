use advice_engine::PositionContext;
use advisor_core::{Advice, SentimentSummary};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use portfolio_store::EnrichedHolding;

use crate::{ApiResponse, AppError, AppState};

const ADVICE_NEWS_DAYS: i64 = 1;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/portfolio/:user_id", get(get_portfolio))
        .route("/api/v1/advice/:user_id/:symbol", get(get_advice))
}

async fn get_portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<EnrichedHolding>>>, AppError> {
    let holdings = state.store.get_holdings(user_id).await?;
    if holdings.is_empty() {
        return Err(AppError::NotFound("Portföy bulunamadı".to_string()));
    }

    // Sequential by design: one quote lookup per holding
    let mut enriched = Vec::with_capacity(holdings.len());
    for holding in &holdings {
        let quote = if holding.asset_type == "stock" {
            state.market.fetch_stock_quote(&holding.symbol).await
        } else {
            state.market.fetch_crypto_quote(&holding.symbol).await
        };

        enriched.push(EnrichedHolding::from_holding(
            holding,
            quote.map(|q| q.price),
        ));
    }

    Ok(Json(ApiResponse::success(enriched)))
}

async fn get_advice(
    State(state): State<AppState>,
    Path((user_id, symbol)): Path<(i64, String)>,
) -> Result<Json<ApiResponse<Advice>>, AppError> {
    let symbol = symbol.to_uppercase();

    let history = state
        .store
        .price_history(&symbol, state.trend.window() as i64)
        .await?;
    let trend = state
        .trend
        .predict_trend(&symbol, &history)
        .await
        .ok_or_else(|| AppError::NotFound("Tavsiye oluşturulamadı".to_string()))?;

    let holding = state.store.get_holding(user_id, &symbol).await?;
    let position = holding.map(|h| PositionContext {
        quantity: h.quantity,
    });

    let items = state.news.fetch_news(Some(&symbol), ADVICE_NEWS_DAYS).await;
    let sentiment = SentimentSummary::from_items(&items);

    let advice = advice_engine::synthesize(&trend, position.as_ref(), &sentiment);

    Ok(Json(ApiResponse::success(advice)))
}
