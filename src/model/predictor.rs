//! Adapter between aligned feature tables and a loaded classifier.

use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::record_batch::RecordBatch;

use super::{ClassLabel, Classifier, FeatureMatrix, ModelArtifact};
use crate::error::{AttritionError, Result};
use crate::utils::logging::log_operation_complete;

/// Per-row output of a classifier, in input row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions {
    /// Label chosen by the model's own decision rule
    pub labels: Vec<ClassLabel>,
    /// Probability of the attrition class
    pub probabilities: Vec<f64>,
}

impl Predictions {
    /// Number of scored rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no rows were scored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Loaded classifier handle
///
/// Built once when the process starts and shared read-only afterwards; a
/// different artifact requires a restart.
#[derive(Debug)]
pub struct Predictor {
    classes: [ClassLabel; 2],
    n_features: usize,
    feature_names: Option<Vec<String>>,
    kind: &'static str,
    source: PathBuf,
    classifier: Box<dyn Classifier>,
}

impl Predictor {
    /// Load the artifact at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let start = Instant::now();
        let artifact = ModelArtifact::from_path(path)?;
        let predictor = Self::from_artifact(artifact, path);
        log::info!(
            "Loaded {} model with {} features from {} in {:?}",
            predictor.kind,
            predictor.n_features,
            path.display(),
            start.elapsed()
        );
        Ok(predictor)
    }

    /// Wrap an already validated artifact
    #[must_use]
    pub fn from_artifact(artifact: ModelArtifact, source: &Path) -> Self {
        let kind = artifact.kind_name();
        let classes = artifact.classes.clone();
        let n_features = artifact.n_features;
        let feature_names = artifact.feature_names.clone();

        Self {
            classes,
            n_features,
            feature_names,
            kind,
            source: source.to_path_buf(),
            classifier: artifact.into_classifier(),
        }
    }

    /// Number of features the model expects
    #[must_use]
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    /// Class labels, attrition class last
    #[must_use]
    pub const fn classes(&self) -> &[ClassLabel; 2] {
        &self.classes
    }

    /// Where the artifact was loaded from
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Score an aligned feature table
    ///
    /// The column layout must be the one the model was trained on. A mismatch
    /// means the feature list and the artifact have drifted apart and is
    /// reported as an inference error.
    pub fn predict(&self, aligned: &RecordBatch) -> Result<Predictions> {
        self.check_shape(aligned)?;
        if aligned.num_rows() == 0 {
            return Ok(Predictions::default());
        }

        let start = Instant::now();
        let features = FeatureMatrix::from_batch(aligned)?;
        let indices = self.classifier.predict(&features);
        let probabilities = self.classifier.predict_proba(&features);

        if indices.len() != features.n_rows() || probabilities.len() != features.n_rows() {
            return Err(AttritionError::inference(format!(
                "Model returned {} labels and {} probabilities for {} rows",
                indices.len(),
                probabilities.len(),
                features.n_rows()
            )));
        }

        let labels = indices
            .into_iter()
            .map(|i| {
                self.classes.get(i).cloned().ok_or_else(|| {
                    AttritionError::inference(format!("Model returned class index {i}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log_operation_complete(
            "Scored",
            labels.len(),
            &format!("model {}", self.source.display()),
            Some(start.elapsed()),
        );
        Ok(Predictions {
            labels,
            probabilities,
        })
    }

    fn check_shape(&self, aligned: &RecordBatch) -> Result<()> {
        if aligned.num_columns() != self.n_features {
            return Err(AttritionError::inference(format!(
                "Aligned table has {} columns, model expects {}",
                aligned.num_columns(),
                self.n_features
            )));
        }

        if let Some(names) = &self.feature_names {
            let schema = aligned.schema();
            let mismatch = schema
                .fields()
                .iter()
                .zip(names)
                .enumerate()
                .find(|(_, (field, name))| field.name() != *name);
            if let Some((position, (field, name))) = mismatch {
                return Err(AttritionError::inference(format!(
                    "Column {position} is '{}', model was trained on '{name}'",
                    field.name()
                )));
            }
        }

        Ok(())
    }
}
