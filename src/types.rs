//! Wire types shared by the sentiment service and the analyze client

use crate::error::{Result, SentimentError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable data source label attached to every service response
pub const DATA_SOURCE: &str = "Reddit (r/CryptoCurrency)";

/// Coin analyzed when no coin is given
pub const DEFAULT_COIN: &str = "bitcoin";

/// Sentiment direction derived from a sentiment percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    /// `Bullish` at 60% and above, `Bearish` at 40% and below
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 60.0 {
            Direction::Bullish
        } else if percent <= 40.0 {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Bullish => "Bullish",
            Direction::Bearish => "Bearish",
            Direction::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a successful `/api/analyze` call as produced by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReport {
    pub coin: String,
    pub sentiment_percent: f64,
    pub sentiment_direction: Direction,
    pub posts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "data_source")]
    pub data_source: String,
    pub timestamp: DateTime<Utc>,
}

/// `{ "error": "..." }` body used by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// One coin in the trending listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub coin: String,
    pub sentiment: f64,
    pub direction: Direction,
    pub posts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingReport {
    pub trending: Vec<TrendingEntry>,
    pub data_source: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub reddit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub services: ServiceStatus,
    pub data_source: String,
    pub timestamp: DateTime<Utc>,
}

/// `/api/analyze` response as seen by a client.
///
/// Every field is optional because the body may be either the success or
/// the failure shape; [`AnalyzeResponse::into_outcome`] decides which.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Any JSON value; see [`error_text`] for which values count
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub coin: Option<String>,
    #[serde(default)]
    pub sentiment_direction: Option<String>,
    #[serde(default)]
    pub sentiment_percent: Option<f64>,
}

/// Classified analyze response
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    /// Parsed body carried an `error` field
    Failure(String),
    Success {
        coin: String,
        direction: String,
        percent: f64,
    },
}

impl AnalyzeResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(serde_json::Value::String(message.into())),
            ..Default::default()
        }
    }

    pub fn success(coin: impl Into<String>, direction: impl Into<String>, percent: f64) -> Self {
        Self {
            error: None,
            coin: Some(coin.into()),
            sentiment_direction: Some(direction.into()),
            sentiment_percent: Some(percent),
        }
    }

    /// A truthy `error` value makes the body a failure. Otherwise it must be
    /// a complete success body, and one missing any of its three fields is
    /// malformed.
    pub fn into_outcome(self) -> Result<AnalyzeOutcome> {
        if let Some(error) = self.error.as_ref().and_then(error_text) {
            return Ok(AnalyzeOutcome::Failure(error));
        }

        Ok(AnalyzeOutcome::Success {
            coin: self.coin.ok_or(SentimentError::MalformedResponse("coin"))?,
            direction: self
                .sentiment_direction
                .ok_or(SentimentError::MalformedResponse("sentimentDirection"))?,
            percent: self
                .sentiment_percent
                .ok_or(SentimentError::MalformedResponse("sentimentPercent"))?,
        })
    }
}

/// Display text of an `error` value, or `None` when the value is falsy
/// (`null`, `false`, `0`, `""`).
///
/// Strings show verbatim, numbers and booleans as their JSON text, arrays
/// as their items joined with commas and objects as `[object Object]`,
/// which is what the browser page prints for the same body.
pub fn error_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(join_text(other)),
    }
}

fn join_text(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(join_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_thresholds() {
        assert_eq!(Direction::from_percent(100.0), Direction::Bullish);
        assert_eq!(Direction::from_percent(60.0), Direction::Bullish);
        assert_eq!(Direction::from_percent(59.99), Direction::Neutral);
        assert_eq!(Direction::from_percent(50.0), Direction::Neutral);
        assert_eq!(Direction::from_percent(40.01), Direction::Neutral);
        assert_eq!(Direction::from_percent(40.0), Direction::Bearish);
        assert_eq!(Direction::from_percent(0.0), Direction::Bearish);
    }

    #[test]
    fn test_report_wire_names() {
        let report = SentimentReport {
            coin: "bitcoin".to_string(),
            sentiment_percent: 72.5,
            sentiment_direction: Direction::Bullish,
            posts: 12,
            message: None,
            data_source: DATA_SOURCE.to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sentimentPercent"], 72.5);
        assert_eq!(json["sentimentDirection"], "Bullish");
        assert_eq!(json["data_source"], DATA_SOURCE);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_report_parses_as_analyze_response() {
        let json = r#"{
            "coin": "solana",
            "sentimentPercent": 41.5,
            "sentimentDirection": "Neutral",
            "posts": 3,
            "data_source": "Reddit (r/CryptoCurrency)",
            "timestamp": "2024-01-15T10:30:00Z"
        }"#;
        let resp: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.into_outcome().unwrap(),
            AnalyzeOutcome::Success {
                coin: "solana".to_string(),
                direction: "Neutral".to_string(),
                percent: 41.5,
            }
        );
    }

    #[test]
    fn test_error_field_wins() {
        let resp: AnalyzeResponse =
            serde_json::from_str(r#"{"error": "unknown coin", "coin": "x"}"#).unwrap();
        assert_eq!(
            resp.into_outcome().unwrap(),
            AnalyzeOutcome::Failure("unknown coin".to_string())
        );
    }

    #[test]
    fn test_non_string_error_values() {
        let outcome = |body: &str| {
            serde_json::from_str::<AnalyzeResponse>(body)
                .unwrap()
                .into_outcome()
        };

        assert_eq!(
            outcome(r#"{"error": 404}"#).unwrap(),
            AnalyzeOutcome::Failure("404".to_string())
        );
        assert_eq!(
            outcome(r#"{"error": 1.5}"#).unwrap(),
            AnalyzeOutcome::Failure("1.5".to_string())
        );
        assert_eq!(
            outcome(r#"{"error": true}"#).unwrap(),
            AnalyzeOutcome::Failure("true".to_string())
        );
        assert_eq!(
            outcome(r#"{"error": ["rate", "limited"]}"#).unwrap(),
            AnalyzeOutcome::Failure("rate,limited".to_string())
        );
        assert_eq!(
            outcome(r#"{"error": {"code": 7}}"#).unwrap(),
            AnalyzeOutcome::Failure("[object Object]".to_string())
        );
    }

    #[test]
    fn test_falsy_error_values_fall_through() {
        for error in ["null", "false", "0", "0.0", r#""""#] {
            let body = format!(
                r#"{{"error": {}, "coin": "bitcoin", "sentimentDirection": "Bullish", "sentimentPercent": 61.0}}"#,
                error
            );
            let resp: AnalyzeResponse = serde_json::from_str(&body).unwrap();
            assert_eq!(
                resp.into_outcome().unwrap(),
                AnalyzeOutcome::Success {
                    coin: "bitcoin".to_string(),
                    direction: "Bullish".to_string(),
                    percent: 61.0,
                },
                "error: {}",
                error
            );
        }

        let resp: AnalyzeResponse = serde_json::from_str(r#"{"error": false}"#).unwrap();
        assert!(matches!(
            resp.into_outcome(),
            Err(SentimentError::MalformedResponse("coin"))
        ));
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let resp: AnalyzeResponse =
            serde_json::from_str(r#"{"coin": "bitcoin", "sentimentDirection": "up"}"#).unwrap();
        let err = resp.into_outcome().unwrap_err();
        assert!(matches!(err, SentimentError::MalformedResponse("sentimentPercent")));

        let resp: AnalyzeResponse = serde_json::from_str(r#"{"error": ""}"#).unwrap();
        assert!(resp.into_outcome().is_err());
    }

    #[test]
    fn test_non_object_body_fails_to_parse() {
        assert!(serde_json::from_str::<AnalyzeResponse>("[1, 2]").is_err());
        assert!(serde_json::from_str::<AnalyzeResponse>("not json").is_err());
    }
}
