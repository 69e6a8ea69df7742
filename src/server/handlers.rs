//! Route handlers

use super::{ApiError, AppState};
use crate::types::{
    HealthReport, SentimentReport, ServiceStatus, TrendingReport, DATA_SOURCE,
};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const APP_JS: &str = include_str!("../../assets/app.js");

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default)]
    pub coin: String,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn app_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], APP_JS)
}

pub async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<SentimentReport>, ApiError> {
    state.analyze(&query.coin).await.map(Json)
}

pub async fn trending(State(state): State<AppState>) -> Result<Json<TrendingReport>, ApiError> {
    let trending = state.trending().await?;

    Ok(Json(TrendingReport {
        trending,
        data_source: DATA_SOURCE.to_string(),
        timestamp: Utc::now(),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let reddit = state.reddit_healthy().await;

    Json(HealthReport {
        status: "healthy".to_string(),
        services: ServiceStatus { reddit },
        data_source: DATA_SOURCE.to_string(),
        timestamp: Utc::now(),
    })
}
