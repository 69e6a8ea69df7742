//! Crypto Sentiment Analyzer
//!
//! Scores recent r/CryptoCurrency posts about a coin and renders the result
//! as a one-line summary.

pub mod config;
pub mod controller;
pub mod error;
pub mod reddit;
pub mod sentiment;
pub mod server;
pub mod types;
