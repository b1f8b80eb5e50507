use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the similarity engine.
///
/// Only `DataInsufficient`, `Io`, `Codec` and `InvalidBundle` ever reach a
/// retrain caller. Scoring absorbs all of them and `Extraction` never leaves
/// the corpus loader.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not enough data to fit a vector space: {0}")]
    DataInsufficient(&'static str),

    #[error("No persisted model bundle at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to extract text from {}: {reason}", path.display())]
    Extraction { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bundle encoding error: {0}")]
    Codec(#[from] serde_cbor::Error),

    #[error("Invalid model bundle: {0}")]
    InvalidBundle(String),
}

impl EngineError {
    /// The "no model yet" state, which callers treat as a valid initial state.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound(_))
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
