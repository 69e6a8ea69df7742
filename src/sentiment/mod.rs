//! Reddit Sentiment Scoring Module
//!
//! Turns a batch of post texts into a 0-100 sentiment percentage and a
//! Bullish/Bearish/Neutral direction.

pub mod sentiment_analyzer;

pub use sentiment_analyzer::{SentimentAnalyzer, NEUTRAL_PERCENT};

use crate::types::Direction;

/// Percentage and direction for one batch of posts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub percent: f64,
    pub direction: Direction,
}

impl SentimentScore {
    pub fn from_percent(percent: f64) -> Self {
        Self {
            percent,
            direction: Direction::from_percent(percent),
        }
    }

    pub fn neutral() -> Self {
        Self::from_percent(NEUTRAL_PERCENT)
    }
}

/// Score posts with a fresh analyzer
pub fn calculate_sentiment(posts: &[String]) -> f64 {
    SentimentAnalyzer::new().calculate(posts)
}

impl SentimentAnalyzer {
    /// Score posts and derive the direction label
    pub fn score(&self, posts: &[String]) -> SentimentScore {
        SentimentScore::from_percent(self.calculate(posts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_score() {
        let score = SentimentScore::neutral();
        assert_eq!(score.percent, 50.0);
        assert_eq!(score.direction, Direction::Neutral);
    }

    #[test]
    fn test_score_direction() {
        let analyzer = SentimentAnalyzer::new();

        let bullish = analyzer.score(&["bitcoin to the moon, buy now".to_string()]);
        assert_eq!(bullish.percent, 100.0);
        assert_eq!(bullish.direction, Direction::Bullish);

        let bearish = analyzer.score(&["panic sell everything".to_string()]);
        assert_eq!(bearish.direction, Direction::Bearish);
    }

    #[test]
    fn test_calculate_sentiment_helper() {
        let posts = vec!["hodl".to_string(), "bag".to_string()];
        // (3 + -1) / 2 = 1 -> 60%
        assert_eq!(calculate_sentiment(&posts), 60.0);
    }
}
