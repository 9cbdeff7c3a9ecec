//! Error handling for attrition scoring.
//!
//! Three kinds of failure matter to callers and are kept apart: the uploaded
//! table could not be interpreted ([`AttritionError::Schema`]), the model
//! artifact could not be loaded ([`AttritionError::ArtifactLoad`]), and the
//! artifact rejected the aligned table ([`AttritionError::Inference`]).

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for attrition scoring
#[derive(Debug, thiserror::Error)]
pub enum AttritionError {
    /// The raw input cannot be interpreted as a usable table
    #[error("Schema error: {0}")]
    Schema(String),

    /// The model artifact is missing, unreadable or incompatible
    #[error("Artifact load error for {}: {reason}", .path.display())]
    ArtifactLoad {
        /// Location the artifact was read from
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// The aligned table does not match what the artifact was trained on
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error building or transforming Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),
}

impl AttritionError {
    /// Create a schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create an artifact load error for `path`
    pub fn artifact_load(path: &Path, reason: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Short, stable name of the error kind, used when logging
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Schema(_) => "SchemaError",
            Self::ArtifactLoad { .. } => "ArtifactLoadError",
            Self::Inference(_) => "InferenceError",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
            Self::Arrow(_) => "ArrowError",
            Self::Parquet(_) => "ParquetError",
        }
    }

    /// Whether the failure was caused by the uploaded data rather than by the
    /// deployment (artifact, feature list drift, filesystem)
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Human readable message for the person who uploaded the file
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Schema(msg) => format!("Processing failed: {msg}"),
            Self::ArtifactLoad { .. } => {
                "Processing failed: the prediction model is unavailable".to_string()
            }
            _ => "Processing failed: an internal error occurred while scoring".to_string(),
        }
    }
}

/// Result type for attrition scoring operations
pub type Result<T> = std::result::Result<T, AttritionError>;
