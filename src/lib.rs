//! Employee attrition scoring.
//!
//! Uploaded HR tables are aligned to the fixed feature schema a classifier was
//! trained on, scored, and returned with a predicted label and attrition
//! probability per employee.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod server;
pub mod utils;

// Re-export the most common types for easier use
pub use config::AttritionConfig;
pub use error::{AttritionError, Result};
pub use model::{ClassLabel, ModelArtifact, Predictions, Predictor};
pub use pipeline::{DisplayRow, PredictionPipeline, ScoredTable, preview};
pub use reader::{parse_csv, read_table};
pub use schema::{AlignmentReport, EXPECTED_FEATURES, FeatureAligner, align};

// Arrow types
pub use arrow::record_batch::RecordBatch;
