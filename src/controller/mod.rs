//! Analyze controller
//!
//! Reads a coin from the input, asks the sentiment service about it and
//! writes one line of text into an output region. Every activation is an
//! independent request/display cycle: overlapping activations are neither
//! cancelled nor coalesced, so whichever response arrives last owns the
//! display.

mod http;

pub use http::HttpAnalyzeApi;

use crate::error::Result;
use crate::types::{AnalyzeOutcome, AnalyzeResponse, DEFAULT_COIN};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;

/// Shown for any transport or parse failure
pub const FALLBACK_MESSAGE: &str = "An error occurred while analyzing sentiment.";

/// The `/api/analyze` endpoint (allows mocking)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyzeApi: Send + Sync {
    async fn analyze(&self, coin: &str) -> Result<AnalyzeResponse>;
}

/// Display region whose text reflects the latest result
pub trait OutputRegion: Send + Sync {
    fn set_text(&self, text: &str);
}

/// Prints every update as a line on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleOutput;

impl OutputRegion for ConsoleOutput {
    fn set_text(&self, text: &str) {
        println!("{}", text);
    }
}

/// Shared in-memory text; the last write wins
#[derive(Debug, Default, Clone)]
pub struct TextBuffer {
    text: Arc<Mutex<String>>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text.lock().clone()
    }
}

impl OutputRegion for TextBuffer {
    fn set_text(&self, text: &str) {
        *self.text.lock() = text.to_string();
    }
}

/// Trimmed input, or `bitcoin` when nothing is left
pub fn resolve_coin(input: &str) -> &str {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_COIN
    } else {
        trimmed
    }
}

/// Two-decimal text where an exact tie goes to the larger magnitude
/// (`50.625` → `50.63`), as browsers print percentages.
///
/// `{:.2}` alone rounds exact ties to even. A double sits exactly halfway
/// between two hundredths only when it is an odd multiple of 1/8, which
/// `value * 8.0` detects without rounding error.
pub fn to_fixed_2(value: f64) -> String {
    if value == 0.0 {
        return "0.00".to_string();
    }

    let eighths = value.abs() * 8.0;
    let is_tie = eighths < 1e15 && eighths.fract() == 0.0 && eighths % 2.0 == 1.0;
    if !is_tie {
        return format!("{:.2}", value);
    }

    // |value| * 100 = 12.5 * eighths, exact at this magnitude
    let hundredths = (value.abs() * 100.0).ceil() as u64;
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100)
}

/// Display text for a classified response
pub fn render(outcome: &AnalyzeOutcome) -> String {
    match outcome {
        AnalyzeOutcome::Failure(error) => format!("Error: {}", error),
        AnalyzeOutcome::Success {
            coin,
            direction,
            percent,
        } => format!(
            "Coin: {} | Sentiment: {} ({}%)",
            coin,
            direction,
            to_fixed_2(*percent)
        ),
    }
}

pub struct AnalyzeController<A, O> {
    api: A,
    output: O,
}

impl<A: AnalyzeApi, O: OutputRegion> AnalyzeController<A, O> {
    pub fn new(api: A, output: O) -> Self {
        Self { api, output }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// One activation: request sentiment for `input` and display the result.
    ///
    /// Never fails; transport and parse errors are logged and replaced by
    /// [`FALLBACK_MESSAGE`].
    pub async fn analyze(&self, input: &str) {
        let coin = resolve_coin(input);

        let outcome = self
            .api
            .analyze(coin)
            .await
            .and_then(AnalyzeResponse::into_outcome);

        let text = match outcome {
            Ok(outcome) => render(&outcome),
            Err(e) => {
                tracing::error!("Sentiment analysis for {} failed: {}", coin, e);
                FALLBACK_MESSAGE.to_string()
            }
        };

        self.output.set_text(&text);
    }
}

/// Treat every line read from `reader` as one activation, each on its own
/// task. Returns the number of activations once input ends and every
/// spawned request has finished.
pub async fn run_prompt<A, O, R>(controller: Arc<AnalyzeController<A, O>>, reader: R) -> Result<usize>
where
    A: AnalyzeApi + 'static,
    O: OutputRegion + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut tasks = JoinSet::new();
    let mut activations = 0;

    while let Some(line) = lines.next_line().await? {
        let controller = Arc::clone(&controller);
        tasks.spawn(async move { controller.analyze(&line).await });
        activations += 1;
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Analyze task panicked: {}", e);
        }
    }

    Ok(activations)
}
