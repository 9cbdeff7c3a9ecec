//! Configuration for attrition scoring.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{AttritionError, Result};
use crate::schema::features::{CATEGORICAL_COLUMNS, DROP_COLUMNS, EXPECTED_FEATURES, ID_COLUMN};

/// Beyond this many places `f64` carries no further precision
pub const MAX_PROBABILITY_DECIMALS: u32 = 15;

/// Configuration for reading uploads, aligning features and shaping output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttritionConfig {
    /// Identifier column shown next to each prediction
    pub id_column: String,
    /// Columns removed before alignment when present
    pub drop_columns: Vec<String>,
    /// Categorical attributes expanded into indicator columns
    pub categorical_columns: Vec<String>,
    /// Ordered feature list the classifier was trained on
    pub expected_features: Vec<String>,
    /// Decimal places kept for probabilities in the output
    pub probability_decimals: u32,
    /// Name of the appended label column
    pub label_column: String,
    /// Name of the appended probability column
    pub probability_column: String,
    /// Field delimiter of uploaded text files
    pub delimiter: char,
    /// Default location of the downloadable result file
    pub output_path: PathBuf,
    /// Largest upload body accepted by the HTTP service
    pub max_upload_bytes: usize,
}

impl Default for AttritionConfig {
    fn default() -> Self {
        Self {
            id_column: ID_COLUMN.to_string(),
            drop_columns: DROP_COLUMNS.iter().map(ToString::to_string).collect(),
            categorical_columns: CATEGORICAL_COLUMNS.iter().map(ToString::to_string).collect(),
            expected_features: EXPECTED_FEATURES.iter().map(ToString::to_string).collect(),
            probability_decimals: 4,
            label_column: "Predicted_Attrition".to_string(),
            probability_column: "Probability".to_string(),
            delimiter: ',',
            output_path: PathBuf::from("prediksi_attrition.csv"),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl AttritionConfig {
    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AttritionError::Config(format!("Invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.expected_features.is_empty() {
            return Err(AttritionError::Config(
                "expected_features must not be empty".to_string(),
            ));
        }

        let mut seen = FxHashSet::default();
        if let Some(dup) = self.expected_features.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(AttritionError::Config(format!(
                "Duplicate expected feature '{dup}'"
            )));
        }

        if self.probability_decimals > MAX_PROBABILITY_DECIMALS {
            return Err(AttritionError::Config(format!(
                "probability_decimals {} exceeds {MAX_PROBABILITY_DECIMALS}",
                self.probability_decimals
            )));
        }

        if !self.delimiter.is_ascii() {
            return Err(AttritionError::Config(format!(
                "Delimiter '{}' is not a single-byte character",
                self.delimiter
            )));
        }

        if self.label_column == self.probability_column {
            return Err(AttritionError::Config(
                "label_column and probability_column must differ".to_string(),
            ));
        }

        Ok(())
    }

    /// Delimiter as the byte the CSV reader and writer expect
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter).unwrap_or(b',')
    }
}
