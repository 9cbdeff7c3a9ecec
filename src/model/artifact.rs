//! Serialized model artifacts.
//!
//! An artifact is a JSON document describing one fitted binary classifier:
//!
//! ```json
//! {
//!   "kind": "random_forest",
//!   "classes": [0, 1],
//!   "n_features": 44,
//!   "feature_names": ["Age", "DailyRate", "..."],
//!   "trees": [{ "children_left": [], "children_right": [], "feature": [],
//!               "threshold": [], "value": [] }]
//! }
//! ```
//!
//! `kind` selects the model family; `feature_names` is optional and, when
//! present, is checked against the columns handed to the model.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ClassLabel, Classifier, LogisticRegression, RandomForest};
use crate::error::{AttritionError, Result};
use crate::utils::logging::log_operation_start;

/// Model family and its fitted parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest(RandomForest),
    LogisticRegression(LogisticRegression),
}

/// A fitted binary classifier as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Class labels; index 1 is the attrition class
    pub classes: [ClassLabel; 2],
    /// Number of input features the model was trained on
    pub n_features: usize,
    /// Training-time feature names, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub model: ModelKind,
}

impl ModelArtifact {
    /// Read and validate an artifact from `path`
    pub fn from_path(path: &Path) -> Result<Self> {
        log_operation_start("Loading model artifact", path);

        if !path.is_file() {
            return Err(AttritionError::artifact_load(path, "file not found"));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AttritionError::artifact_load(path, format!("unreadable: {e}")))?;
        let artifact: Self = serde_json::from_str(&content)
            .map_err(|e| AttritionError::artifact_load(path, format!("corrupt artifact: {e}")))?;
        artifact
            .validate()
            .map_err(|e| AttritionError::artifact_load(path, format!("incompatible artifact: {e}")))?;

        Ok(artifact)
    }

    /// Write the artifact as JSON
    pub fn to_path(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AttritionError::artifact_load(path, e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Structural checks shared by every model family
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.n_features == 0 {
            return Err("n_features must be positive".to_string());
        }
        if self.classes[0] == self.classes[1] {
            return Err(format!("classes must differ, got {} twice", self.classes[0]));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.n_features
                ));
            }
        }

        match &self.model {
            ModelKind::RandomForest(forest) => forest.validate(self.n_features),
            ModelKind::LogisticRegression(linear) => linear.validate(self.n_features),
        }
    }

    /// Short name of the model family, for logging
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self.model {
            ModelKind::RandomForest(_) => "random_forest",
            ModelKind::LogisticRegression(_) => "logistic_regression",
        }
    }

    /// Turn the fitted parameters into a classifier
    #[must_use]
    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self.model {
            ModelKind::RandomForest(forest) => Box::new(forest),
            ModelKind::LogisticRegression(linear) => Box::new(linear),
        }
    }
}
