//! Error types for releval.

use thiserror::Error;

/// Result type for releval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for releval operations.
///
/// Every variant is fatal for the evaluation run that raised it: this is a
/// one-shot batch computation over static data, so there is nothing to retry.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Gold and predicted sequences differ in length.
    #[error("Length mismatch: {gold} gold labels vs {predicted} predictions")]
    LengthMismatch {
        /// Number of gold labels.
        gold: usize,
        /// Number of predictions.
        predicted: usize,
    },

    /// A probability row has the wrong number of entries.
    #[error("Probability row {index} has {actual} entries, expected {expected}")]
    ProbabilityShape {
        /// Row position in the prediction sequence.
        index: usize,
        /// Vocabulary size.
        expected: usize,
        /// Entries actually present.
        actual: usize,
    },

    /// Label name absent from the vocabulary.
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Label ID absent from the vocabulary.
    #[error("Unknown label id: {0}")]
    UnknownLabelId(usize),

    /// No positive instances left to rank.
    #[error("No instances to rank: every gold label is '{0}'")]
    EmptyRankSet(String),

    /// Malformed label vocabulary.
    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    /// Dataset loading/parsing error.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Predictions loading/parsing error.
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Malformed configuration file.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a vocabulary error.
    pub fn vocabulary(msg: impl Into<String>) -> Self {
        Error::Vocabulary(msg.into())
    }

    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Error::Dataset(msg.into())
    }

    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Error::Prediction(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
