// src/error.rs
//! Engine error taxonomy. Arithmetic guards never surface here: divisions by a zero
//! denominator resolve to 0 inside the detectors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("thumbnail could not be decoded ({}): {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("invalid pixel grid: {0}")]
    InvalidGrid(String),

    #[error("no idea selected; pick one before assembling a script")]
    NoIdeaSelected,

    #[error("idea index {index} out of range (have {len})")]
    IdeaOutOfRange { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Required input missing; idea selection problems are reported separately.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
