//! Pre-trained attrition classifiers and the adapter that scores aligned tables.

pub mod artifact;
pub mod forest;
pub mod linear;
pub mod predictor;

use std::fmt;

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::{AttritionError, Result};
use crate::utils::arrow::as_float64;

pub use artifact::{ModelArtifact, ModelKind};
pub use forest::{DecisionTree, RandomForest};
pub use linear::LogisticRegression;
pub use predictor::{Predictions, Predictor};

/// Class label as stored in the artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    /// Numeric label, typically `0` / `1`
    Integer(i64),
    /// Text label, e.g. `"No"` / `"Yes"`
    Text(String),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// A binary classifier over dense feature rows
///
/// Index `1` of the artifact's classes is the attrition (positive) class.
pub trait Classifier: fmt::Debug + Send + Sync {
    /// Class index chosen by the model's own decision rule, per row
    fn predict(&self, features: &FeatureMatrix) -> Vec<usize>;

    /// Probability of the positive class, per row
    fn predict_proba(&self, features: &FeatureMatrix) -> Vec<f64>;
}

/// Row-major dense matrix of feature values
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl FeatureMatrix {
    /// Build a matrix from row-major `values`
    pub fn new(values: Vec<f64>, n_cols: usize) -> Result<Self> {
        if n_cols == 0 {
            if !values.is_empty() {
                return Err(AttritionError::inference("Values given for zero columns"));
            }
            return Ok(Self {
                values,
                n_rows: 0,
                n_cols,
            });
        }
        if values.len() % n_cols != 0 {
            return Err(AttritionError::inference(format!(
                "{} values do not fill rows of {n_cols} columns",
                values.len()
            )));
        }
        Ok(Self {
            n_rows: values.len() / n_cols,
            values,
            n_cols,
        })
    }

    /// Copy a table of `Float64` columns into a row-major matrix
    pub fn from_batch(batch: &RecordBatch) -> Result<Self> {
        let n_rows = batch.num_rows();
        let n_cols = batch.num_columns();
        let schema = batch.schema();
        let mut values = vec![0.0; n_rows * n_cols];

        for (col, (field, column)) in schema.fields().iter().zip(batch.columns()).enumerate() {
            let column = as_float64(field.name(), column)?;
            if column.null_count() > 0 {
                return Err(AttritionError::inference(format!(
                    "Aligned column '{}' contains nulls",
                    field.name()
                )));
            }
            for (row, value) in column.values().iter().enumerate() {
                values[row * n_cols + col] = *value;
            }
        }

        Ok(Self {
            values,
            n_rows,
            n_cols,
        })
    }

    /// Number of rows
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Iterate over rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.n_cols.max(1))
    }
}
