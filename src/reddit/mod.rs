//! Reddit API client
//!
//! Fetches recent r/CryptoCurrency posts that mention a coin:
//! - OAuth client-credentials authentication with a cached token
//! - Subreddit search with one re-authentication on an expired token
//! - Title/selftext extraction for sentiment scoring


use crate::config::RedditConfig;
use crate::error::{Result, SentimentError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;

/// Source of post texts for a coin (allows mocking)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Lowercased post texts mentioning `coin`
    async fn fetch_posts(&self, coin: &str) -> Result<Vec<String>>;

    /// Authenticate and run a sample search
    async fn test_connection(&self) -> Result<()>;
}

/// Search listing returned by `/r/<sub>/search.json`
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
pub struct ListingChild {
    pub data: Post,
}

#[derive(Debug, Default, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub subreddit: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: String,
    #[serde(default)]
    #[allow(dead_code)]
    expires_in: u64,
}

/// Reddit OAuth client
pub struct RedditClient {
    http: Client,
    client_id: String,
    client_secret: String,
    config: RedditConfig,
    /// Cached bearer token
    access_token: RwLock<Option<String>>,
}

impl RedditClient {
    /// Create a client from configuration. Fails when either credential is blank.
    pub fn new(config: &RedditConfig) -> Result<Self> {
        let client_id = config.client_id.trim().to_string();
        let client_secret = config.client_secret.trim().to_string();

        if client_id.is_empty() || client_secret.is_empty() {
            return Err(SentimentError::MissingCredentials);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            client_id,
            client_secret,
            config: config.clone(),
            access_token: RwLock::new(None),
        })
    }

    /// Request a fresh token and cache it
    pub async fn authenticate(&self) -> Result<String> {
        let response = self
            .http
            .post(&self.config.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Auth(format!(
                "Reddit authentication failed: {}",
                body
            )));
        }

        let token: TokenResponse = response.json().await?;
        *self.access_token.write().await = Some(token.access_token.clone());

        tracing::debug!("Obtained Reddit access token");
        Ok(token.access_token)
    }

    async fn current_token(&self) -> Result<String> {
        if let Some(token) = self.access_token.read().await.clone() {
            return Ok(token);
        }
        self.authenticate().await
    }

    async fn search(&self, coin: &str, token: &str) -> Result<reqwest::Response> {
        let url = format!(
            "{}/r/{}/search.json",
            self.config.api_url.trim_end_matches('/'),
            self.config.subreddit
        );

        let limit = self.config.search_limit.to_string();

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("q", coin),
                ("restrict_sr", "1"),
                ("limit", limit.as_str()),
                ("sort", "new"),
            ])
            .send()
            .await?;

        Ok(response)
    }

    /// Search the subreddit for `coin` and return post texts
    pub async fn search_posts(&self, coin: &str) -> Result<Vec<String>> {
        let token = self.current_token().await.map_err(|e| {
            SentimentError::Auth(format!("failed to authenticate with Reddit: {}", e.detail()))
        })?;

        let mut response = self.search(coin, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("Reddit token rejected, re-authenticating");
            let token = self.authenticate().await.map_err(|e| {
                SentimentError::Auth(format!(
                    "failed to re-authenticate with Reddit: {}",
                    e.detail()
                ))
            })?;
            response = self.search(coin, &token).await?;
        }

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Api(format!(
                "Reddit API error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let body = response.text().await?;
        let listing: Listing = serde_json::from_str(&body)?;
        let texts = extract_texts(listing);

        tracing::debug!("Fetched {} Reddit posts for {}", texts.len(), coin);
        Ok(texts)
    }
}

#[async_trait]
impl PostSource for RedditClient {
    async fn fetch_posts(&self, coin: &str) -> Result<Vec<String>> {
        self.search_posts(coin).await
    }

    async fn test_connection(&self) -> Result<()> {
        self.authenticate().await?;
        self.search_posts("bitcoin").await.map(|_| ())
    }
}

/// Lowercased title, plus selftext when it adds something; blank posts dropped
pub fn extract_texts(listing: Listing) -> Vec<String> {
    listing
        .data
        .children
        .into_iter()
        .filter_map(|child| {
            let title = child.data.title.to_lowercase();
            let selftext = child.data.selftext.to_lowercase();

            let mut combined = title;
            if !selftext.is_empty() && selftext != combined {
                combined.push(' ');
                combined.push_str(&selftext);
            }

            if combined.trim().is_empty() {
                None
            } else {
                Some(combined)
            }
        })
        .collect()
}
