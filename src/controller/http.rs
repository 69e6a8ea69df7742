//! HTTP client for the analyze endpoint

use super::AnalyzeApi;
use crate::error::Result;
use crate::types::AnalyzeResponse;
use async_trait::async_trait;
use reqwest::Client;

/// Calls `GET <base_url>/api/analyze?coin=<coin>`
pub struct HttpAnalyzeApi {
    http: Client,
    base_url: String,
}

impl HttpAnalyzeApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder().build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AnalyzeApi for HttpAnalyzeApi {
    async fn analyze(&self, coin: &str) -> Result<AnalyzeResponse> {
        let url = format!("{}/api/analyze", self.base_url);

        // Failing endpoints still answer with an `{error}` JSON body, so the
        // status code is not checked.
        let body = self
            .http
            .get(&url)
            .query(&[("coin", coin)])
            .send()
            .await?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }
}
