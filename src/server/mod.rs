//! Sentiment HTTP service
//!
//! Serves the analyze page and the JSON API:
//! - `GET /api/analyze?coin=` sentiment for one coin
//! - `GET /api/health` Reddit connectivity
//! - `GET /api/trending` sentiment for the popular coins

mod handlers;

use crate::config::{Config, RedditConfig};
use crate::reddit::{PostSource, RedditClient};
use crate::sentiment::SentimentAnalyzer;
use crate::types::{
    Direction, ErrorBody, SentimentReport, TrendingEntry, DATA_SOURCE, DEFAULT_COIN,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use futures_util::future::join_all;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Coins scored by `/api/trending`, in output order
pub const POPULAR_COINS: [&str; 6] = [
    "bitcoin",
    "ethereum",
    "solana",
    "cardano",
    "polkadot",
    "chainlink",
];

const NO_POSTS_MESSAGE: &str = "No recent posts found for this cryptocurrency";

/// Failures surfaced as `500 {"error": ...}`
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Reddit client could not be constructed
    Unavailable(String),
    /// Reddit fetch failed
    Fetch(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            ApiError::Unavailable(e) => format!("Reddit service unavailable: {}", e),
            ApiError::Fetch(e) => format!("Failed to fetch Reddit data: {}", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    source: Result<Arc<dyn PostSource>, String>,
    analyzer: Arc<SentimentAnalyzer>,
}

impl AppState {
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self {
            source: Ok(source),
            analyzer: Arc::new(SentimentAnalyzer::new()),
        }
    }

    /// State whose every Reddit call fails with `reason`
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            source: Err(reason.into()),
            analyzer: Arc::new(SentimentAnalyzer::new()),
        }
    }

    /// Build the Reddit client from configuration, keeping the failure
    /// reason when credentials are missing.
    pub fn from_config(config: &RedditConfig) -> Self {
        match RedditClient::new(config) {
            Ok(client) => Self::new(Arc::new(client)),
            Err(e) => {
                tracing::warn!("Reddit service unavailable: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    fn source(&self) -> Result<&Arc<dyn PostSource>, ApiError> {
        self.source
            .as_ref()
            .map_err(|reason| ApiError::Unavailable(reason.clone()))
    }

    /// Sentiment report for one coin (`bitcoin` when empty)
    pub async fn analyze(&self, coin: &str) -> Result<SentimentReport, ApiError> {
        let coin = if coin.is_empty() { DEFAULT_COIN } else { coin };
        let source = self.source()?;

        let posts = source.fetch_posts(coin).await.map_err(|e| {
            tracing::error!("Reddit API error for {}: {}", coin, e);
            ApiError::Fetch(e.detail())
        })?;

        if posts.is_empty() {
            return Ok(SentimentReport {
                coin: coin.to_string(),
                sentiment_percent: crate::sentiment::NEUTRAL_PERCENT,
                sentiment_direction: Direction::Neutral,
                posts: 0,
                message: Some(NO_POSTS_MESSAGE.to_string()),
                data_source: DATA_SOURCE.to_string(),
                timestamp: Utc::now(),
            });
        }

        let score = self.analyzer.score(&posts);
        tracing::info!(
            "{}: {:.2}% {} from {} posts",
            coin,
            score.percent,
            score.direction,
            posts.len()
        );

        Ok(SentimentReport {
            coin: coin.to_string(),
            sentiment_percent: score.percent,
            sentiment_direction: score.direction,
            posts: posts.len(),
            message: None,
            data_source: DATA_SOURCE.to_string(),
            timestamp: Utc::now(),
        })
    }

    /// Score every popular coin. Coins that fail or have no posts are skipped.
    pub async fn trending(&self) -> Result<Vec<TrendingEntry>, ApiError> {
        let source = self.source()?;

        let results = join_all(POPULAR_COINS.iter().map(|coin| async move {
            (*coin, source.fetch_posts(coin).await)
        }))
        .await;

        let entries = results
            .into_iter()
            .filter_map(|(coin, result)| match result {
                Ok(posts) if !posts.is_empty() => {
                    let score = self.analyzer.score(&posts);
                    Some(TrendingEntry {
                        coin: coin.to_string(),
                        sentiment: score.percent,
                        direction: score.direction,
                        posts: posts.len(),
                    })
                }
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Reddit error for {}: {}", coin, e);
                    None
                }
            })
            .collect();

        Ok(entries)
    }

    /// True when a client exists and its connection test passes
    pub async fn reddit_healthy(&self) -> bool {
        match self.source() {
            Ok(source) => match source.test_connection().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Reddit connection test failed: {}", e);
                    false
                }
            },
            Err(_) => false,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/static/js/app.js", get(handlers::app_js))
        .route("/api/analyze", get(handlers::analyze))
        .route("/api/health", get(handlers::health))
        .route("/api/trending", get(handlers::trending))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(config: &Config, state: AppState) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Crypto Sentiment Analyzer listening on {}", addr);
    tracing::info!("Data source: {}", DATA_SOURCE);
    tracing::info!(
        "Open http://localhost:{} to view the application",
        config.server.port
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}
