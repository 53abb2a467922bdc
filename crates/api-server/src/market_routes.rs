use advisor_core::{NewsItem, Quote, TrendResult};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{ApiResponse, AppError, AppState};

const RELATED_NEWS_DAYS: i64 = 3;

#[derive(Debug, Serialize)]
pub struct MarketAnalysisResponse {
    pub current_data: Quote,
    pub trend_analysis: Option<TrendResult>,
    pub related_news: Vec<NewsItem>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/market/analysis/:symbol", get(get_market_analysis))
}

async fn get_market_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<MarketAnalysisResponse>>, AppError> {
    let symbol = symbol.to_uppercase();

    // Stock first, crypto exchange rate as fallback
    let quote = state
        .market
        .fetch_quote(&symbol)
        .await
        .ok_or_else(|| AppError::NotFound("Veri bulunamadı".to_string()))?;

    let history = state
        .store
        .price_history(&symbol, state.trend.window() as i64)
        .await?;
    let trend_analysis = state.trend.predict_trend(&symbol, &history).await;

    let related_news = state.news.fetch_news(Some(&symbol), RELATED_NEWS_DAYS).await;

    Ok(Json(ApiResponse::success(MarketAnalysisResponse {
        current_data: quote,
        trend_analysis,
        related_news,
    })))
}
