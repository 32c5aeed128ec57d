//! Error Types for the Analysis Pipeline

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failure classes for the snapshot pipeline.
///
/// Resolution falling back to the default instrument is deliberately not an
/// error; it is reported on [`crate::Resolution`] instead. Everything here is
/// local and recoverable - the chat layer maps any variant to one
/// user-visible "unavailable" message via [`AnalysisError::unavailable_message`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Transport-level failure talking to a market-data provider.
    #[error("market data transport error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("market data API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Provider answered 200 but the body did not parse into bars.
    #[error("malformed market data response: {0}")]
    Malformed(String),

    /// Provider answered cleanly with zero bars.
    #[error("no market data returned for {0}")]
    FetchEmpty(String),

    /// Bars were fetched but fewer than the longest indicator window.
    #[error("not enough history: {have} bars, need {need}")]
    InsufficientHistory { have: usize, need: usize },
}

impl AnalysisError {
    /// Whether a single retry is worth attempting.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// The fixed user-visible message for this failure class.
    pub fn unavailable_message(&self) -> String {
        let cause = match self {
            Self::Network(_) => "market data unreachable",
            Self::Api { .. } => "market data provider rejected the request",
            Self::Malformed(_) => "market data response malformed",
            Self::FetchEmpty(_) => "no market data returned",
            Self::InsufficientHistory { .. } => "not enough market history",
        };
        format!("technical analysis unavailable: {cause}")
    }
}
