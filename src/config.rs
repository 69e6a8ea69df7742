//! Configuration management

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub reddit: RedditConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port (also read from `PORT`)
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    /// OAuth client id (also read from `REDDIT_CLIENT_ID`)
    pub client_id: String,
    /// OAuth client secret (also read from `REDDIT_CLIENT_SECRET`)
    pub client_secret: String,
    /// Token endpoint
    pub auth_url: String,
    /// OAuth API base
    pub api_url: String,
    pub user_agent: String,
    /// Subreddit searched for posts
    pub subreddit: String,
    /// Maximum posts per search (Reddit caps this at 100)
    pub search_limit: u32,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the sentiment service used by `analyze` and `prompt`
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            auth_url: "https://www.reddit.com/api/v1/access_token".to_string(),
            api_url: "https://oauth.reddit.com".to_string(),
            user_agent: "CryptoSentimentAnalyzer/1.0".to_string(),
            subreddit: "CryptoCurrency".to_string(),
            search_limit: 100,
            timeout_secs: 30,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl RedditConfig {
    /// Names of required credential variables that are unset or blank
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.trim().is_empty() {
            missing.push("REDDIT_CLIENT_ID");
        }
        if self.client_secret.trim().is_empty() {
            missing.push("REDDIT_CLIENT_SECRET");
        }
        missing
    }
}

impl Config {
    /// Load configuration from an optional file, `SENTIMENT__*` variables and
    /// the plain `REDDIT_CLIENT_ID` / `REDDIT_CLIENT_SECRET` / `PORT` variables.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_string_lossy();
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(
                config::Environment::with_prefix("SENTIMENT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("reddit.client_id", non_blank_env("REDDIT_CLIENT_ID"))?
            .set_override_option("reddit.client_secret", non_blank_env("REDDIT_CLIENT_SECRET"))?
            .set_override_option("server.port", non_blank_env("PORT"))?
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// Load from default locations, falling back to defaults plus environment
    pub fn load_default() -> anyhow::Result<Self> {
        let paths = [
            "config.toml",
            "config.yaml",
            "~/.config/crypto-sentiment/config.toml",
        ];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(expanded.as_ref());
            }
        }

        tracing::debug!("No configuration file found, using defaults and environment");
        Self::load("config.toml")
    }

    /// Socket address string for the server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Trimmed value of `name`; unset and blank both count as absent
fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
