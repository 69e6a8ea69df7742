//! Keyword Sentiment Analyzer
//!
//! Weighted keyword scoring for crypto discussion posts, with short
//! negation and intensifier windows.

use std::collections::HashMap;

/// Characters stripped from both ends of every word
const TRIM_CHARS: &[char] = &['.', ',', '!', '?', ';', ':', '(', ')', '[', ']', '{', '}', '"', '\''];

/// Sentiment-bearing words affected by one negation
const NEGATION_WINDOW: u32 = 3;
/// Sentiment-bearing words affected by one intensifier
const INTENSITY_WINDOW: u32 = 2;
/// Per-post score cap (both directions)
const POST_SCORE_CAP: i32 = 5;
/// Percentage reported when there is nothing to score
pub const NEUTRAL_PERCENT: f64 = 50.0;

/// Sentiment analyzer using weighted keyword lexicons
pub struct SentimentAnalyzer {
    /// Keyword weights (positive = bullish)
    keywords: HashMap<&'static str, i32>,
    /// Intensity multipliers (very, extremely, etc.)
    intensifiers: HashMap<&'static str, f64>,
    /// Negation words
    negations: Vec<&'static str>,
}

impl SentimentAnalyzer {
    /// Create a new analyzer with the default lexicons
    pub fn new() -> Self {
        let mut analyzer = Self {
            keywords: HashMap::new(),
            intensifiers: HashMap::new(),
            negations: Vec::new(),
        };
        analyzer.init_lexicons();
        analyzer
    }

    fn init_lexicons(&mut self) {
        let bullish = [
            ("buy", 3),
            ("moon", 4),
            ("bullish", 4),
            ("long", 2),
            ("pump", 3),
            ("up", 2),
            ("rocket", 4),
            ("hodl", 3),
            ("gain", 3),
            ("profit", 3),
            ("surge", 4),
            ("rally", 3),
            ("breakout", 4),
            ("support", 2),
            ("bull", 4),
            ("rise", 3),
            ("upward", 3),
            ("green", 2),
            ("optimistic", 3),
            ("positive", 2),
            ("strong", 2),
            ("accumulate", 3),
            ("investment", 2),
            ("opportunity", 3),
            ("recovery", 3),
        ];

        let bearish = [
            ("sell", -3),
            ("bear", -4),
            ("bearish", -4),
            ("short", -2),
            ("dump", -4),
            ("down", -2),
            ("crash", -5),
            ("drop", -3),
            ("loss", -3),
            ("dip", -2),
            ("resistance", -2),
            ("panic", -4),
            ("correction", -2),
            ("decline", -3),
            ("fall", -3),
            ("falling", -3),
            ("red", -2),
            ("negative", -2),
            ("weak", -2),
            ("exit", -2),
            ("fear", -3),
            ("bubble", -3),
            ("overvalued", -3),
            ("risky", -2),
        ];

        // Crypto slang
        let slang = [
            ("rekt", -3),
            ("fomo", 2),
            ("fud", -3),
            ("lambo", 3),
            ("bag", -1),
        ];

        for (word, score) in bullish.into_iter().chain(bearish).chain(slang) {
            self.keywords.insert(word, score);
        }

        let intensifiers = [
            ("very", 1.5),
            ("extremely", 1.8),
            ("super", 1.4),
            ("so", 1.3),
            ("really", 1.3),
        ];

        for (word, factor) in intensifiers {
            self.intensifiers.insert(word, factor);
        }

        self.negations = vec![
            "not", "no", "never", "dont", "don't", "cant", "can't", "isnt", "isn't",
        ];
    }

    /// Score one post. The result is capped to [-5, 5].
    pub fn score_post(&self, post: &str) -> i32 {
        let lower = post.to_lowercase();

        let mut score_sum = 0;
        let mut negate_window = 0;
        let mut intensity_window = 0;
        let mut multiplier = 1.0;

        for raw in lower.split_whitespace() {
            let word = clean_word(raw);

            if self.negations.iter().any(|n| *n == word) {
                negate_window = NEGATION_WINDOW;
                continue;
            }

            if let Some(&factor) = self.intensifiers.get(word) {
                intensity_window = INTENSITY_WINDOW;
                multiplier = factor;
                continue;
            }

            let Some(&base) = self.keywords.get(word) else {
                continue;
            };

            let mut score = base;

            if negate_window > 0 {
                score = -score;
                negate_window -= 1;
            }

            if intensity_window > 0 {
                score = round_half_away(score as f64 * multiplier);
                intensity_window -= 1;
                if intensity_window == 0 {
                    multiplier = 1.0;
                }
            }

            score_sum += score;
        }

        score_sum.clamp(-POST_SCORE_CAP, POST_SCORE_CAP)
    }

    /// Aggregate sentiment percentage (0 to 100) across posts.
    ///
    /// Only posts with a non-zero score count towards the average; with no
    /// such posts the result is neutral (50%).
    pub fn calculate(&self, posts: &[String]) -> f64 {
        if posts.is_empty() {
            return NEUTRAL_PERCENT;
        }

        let mut total = 0;
        let mut bearing = 0;

        for post in posts {
            let score = self.score_post(post);
            if score != 0 {
                bearing += 1;
            }
            total += score;
        }

        if bearing == 0 {
            return NEUTRAL_PERCENT;
        }

        let average = total as f64 / bearing as f64;

        // -5 maps to 0%, 0 to 50%, +5 to 100%
        (NEUTRAL_PERCENT + average * 10.0).clamp(0.0, 100.0)
    }

    /// Weight of a single (already lowercase) keyword
    pub fn keyword_weight(&self, word: &str) -> Option<i32> {
        self.keywords.get(word).copied()
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn clean_word(word: &str) -> &str {
    word.trim_matches(TRIM_CHARS)
}

fn round_half_away(value: f64) -> i32 {
    if value > 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("moon!!!"), "moon");
        assert_eq!(clean_word("(bullish)"), "bullish");
        assert_eq!(clean_word("\"don't\""), "don't");
        assert_eq!(clean_word("..."), "");
    }

    #[test]
    fn test_round_half_away() {
        assert_eq!(round_half_away(2.6), 3);
        assert_eq!(round_half_away(4.5), 5);
        assert_eq!(round_half_away(-2.6), -3);
        assert_eq!(round_half_away(-4.5), -5);
        assert_eq!(round_half_away(2.4), 2);
    }

    #[test]
    fn test_keyword_weight() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.keyword_weight("crash"), Some(-5));
        assert_eq!(analyzer.keyword_weight("lambo"), Some(3));
        assert_eq!(analyzer.keyword_weight("mooning"), None);
    }

    #[test]
    fn test_score_plain_keywords() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.score_post("time to buy"), 3);
        assert_eq!(analyzer.score_post("Moon!"), 4);
        assert_eq!(analyzer.score_post("price is flat today"), 0);
    }

    #[test]
    fn test_score_negation() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.score_post("not buy"), -3);
        // Window covers three sentiment words, the fourth is unaffected
        assert_eq!(analyzer.score_post("not up up up up"), -4);
        // Neutral words do not consume the window
        assert_eq!(analyzer.score_post("don't think it will dump"), 4);
    }

    #[test]
    fn test_score_intensifier() {
        let analyzer = SentimentAnalyzer::new();
        // 2 * 1.3 = 2.6 rounds to 3
        assert_eq!(analyzer.score_post("so up"), 3);
        // -2 * 1.5 = -3, 2 * 1.5 = 3, then the multiplier resets
        assert_eq!(analyzer.score_post("very dip up dip"), -2);
    }

    #[test]
    fn test_score_negation_and_intensifier() {
        let analyzer = SentimentAnalyzer::new();
        // -3 * 1.5 = -4.5 rounds away from zero to -5
        assert_eq!(analyzer.score_post("not very buy"), -5);
    }

    #[test]
    fn test_score_is_capped() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.score_post("moon rocket surge breakout"), 5);
        assert_eq!(analyzer.score_post("extremely crash"), -5);
    }

    #[test]
    fn test_calculate_empty_is_neutral() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.calculate(&[]), 50.0);
        assert_eq!(
            analyzer.calculate(&["hello world".to_string(), "gm".to_string()]),
            50.0
        );
    }

    #[test]
    fn test_calculate_averages_bearing_posts_only() {
        let analyzer = SentimentAnalyzer::new();
        let posts = vec!["buy".to_string(), "nothing to see".to_string()];
        assert_eq!(analyzer.calculate(&posts), 80.0);

        let posts = vec!["buy".to_string(), "sell".to_string()];
        assert_eq!(analyzer.calculate(&posts), 50.0);
    }

    #[test]
    fn test_calculate_bounds() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.calculate(&["very bullish".to_string()]), 100.0);
        assert_eq!(analyzer.calculate(&["crash".to_string()]), 0.0);
    }
}
