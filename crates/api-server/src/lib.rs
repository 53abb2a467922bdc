mod chat_routes;
mod market_routes;
mod portfolio_routes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chat_engine::ChatEngine;
use market_data::AlphaVantageClient;
use ml_client::{MlClient, MlConfig};
use news_gateway::NewsGateway;
use portfolio_store::Store;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trend_model::TrendAnalyzer;

/// Uniform response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Route-level error: missing data maps to 404, everything else surfaces as
/// a 500 carrying the error text.
pub enum AppError {
    NotFound(String),
    Internal(anyhow::Error),
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

/// Shared, explicitly constructed services. No lazily initialized globals:
/// everything a handler needs arrives through this state.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub market: AlphaVantageClient,
    pub news: NewsGateway,
    pub trend: TrendAnalyzer,
    pub chat: ChatEngine,
}

impl AppState {
    pub async fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:fintelli.db".to_string());
        let alpha_vantage_key = std::env::var("ALPHA_VANTAGE_API_KEY").unwrap_or_default();
        let news_api_key = std::env::var("NEWS_API_KEY").unwrap_or_default();

        let store = Store::connect(&database_url).await?;
        let ml = MlClient::new(MlConfig::default());

        let market = AlphaVantageClient::new(alpha_vantage_key);
        let news = NewsGateway::new(news_api_key, ml.sentiment.clone());
        let trend = TrendAnalyzer::new(Arc::new(ml.price_predictor.clone()));
        let chat = ChatEngine::new(
            store.clone(),
            trend.clone(),
            news.clone(),
            Arc::new(ml.chat.clone()),
        );

        Ok(Self {
            store,
            market,
            news,
            trend,
            chat,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(market_routes::routes())
        .merge(portfolio_routes::routes())
        .merge(chat_routes::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("api_server=info,tower_http=info");

    let state = AppState::from_env().await?;
    let app = build_router(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("API server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// EnvFilter-based tracing setup with optional JSON output
/// (RUST_LOG_FORMAT=json).
pub fn init_tracing(default_filter: &str) {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
