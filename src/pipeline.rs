//! One upload-and-predict cycle: read, align, score and merge back.
//!
//! [`PredictionPipeline`] is the request boundary. Every failure inside a
//! cycle is logged once by kind here, and callers render it with
//! [`AttritionError::user_message`].

use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use serde::Serialize;

use crate::config::AttritionConfig;
use crate::error::{AttritionError, Result};
use crate::model::{ClassLabel, Predictions, Predictor};
use crate::reader::{parse_csv, read_table};
use crate::schema::{AlignmentReport, FeatureAligner};
use crate::utils::arrow::to_string_array;
use crate::utils::logging::log_request_failure;

/// One row of the on-screen result view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub employee_id: String,
    pub predicted_attrition: ClassLabel,
    pub probability: f64,
}

/// The uploaded table with predictions appended
#[derive(Debug, Clone)]
pub struct ScoredTable {
    table: RecordBatch,
    predictions: Predictions,
    report: AlignmentReport,
    id_column: String,
    label_column: String,
    probability_column: String,
}

impl ScoredTable {
    /// Original columns followed by the label and probability columns
    #[must_use]
    pub const fn table(&self) -> &RecordBatch {
        &self.table
    }

    /// Predictions with probabilities already rounded
    #[must_use]
    pub const fn predictions(&self) -> &Predictions {
        &self.predictions
    }

    /// What alignment did to the upload
    #[must_use]
    pub const fn report(&self) -> &AlignmentReport {
        &self.report
    }

    /// Restrict the table to identifier, label and probability
    pub fn display_batch(&self) -> Result<RecordBatch> {
        let schema = self.table.schema();
        let indices = [&self.id_column, &self.label_column, &self.probability_column]
            .iter()
            .map(|name| {
                schema.index_of(name).map_err(|_| {
                    AttritionError::schema(format!("Column '{name}' is missing from the upload"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.table.project(&indices)?)
    }

    /// The result view as serializable rows
    pub fn display_rows(&self) -> Result<Vec<DisplayRow>> {
        let idx = self.table.schema().index_of(&self.id_column).map_err(|_| {
            AttritionError::schema(format!("Identifier column '{}' is missing", self.id_column))
        })?;
        let ids = to_string_array(self.table.column(idx))?;

        Ok(ids
            .iter()
            .zip(&self.predictions.labels)
            .zip(&self.predictions.probabilities)
            .map(|((id, label), probability)| DisplayRow {
                employee_id: id.unwrap_or_default().to_string(),
                predicted_attrition: label.clone(),
                probability: *probability,
            })
            .collect())
    }

    /// Encode the full table as delimited text with a header row
    pub fn to_csv(&self, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .with_header(true)
            .with_delimiter(delimiter)
            .build(Vec::new());
        writer.write(&self.table)?;
        Ok(writer.into_inner())
    }
}

/// Aligner, predictor and output settings for scoring uploads
#[derive(Debug)]
pub struct PredictionPipeline {
    config: AttritionConfig,
    aligner: FeatureAligner,
    predictor: Predictor,
}

impl PredictionPipeline {
    /// Create a pipeline around an already loaded predictor
    ///
    /// The predictor must have been trained on `config.expected_features`.
    pub fn new(config: AttritionConfig, predictor: Predictor) -> Result<Self> {
        config.validate()?;
        if predictor.n_features() != config.expected_features.len() {
            return Err(AttritionError::inference(format!(
                "Model expects {} features, feature list has {}",
                predictor.n_features(),
                config.expected_features.len()
            )));
        }

        Ok(Self {
            aligner: FeatureAligner::from_config(&config),
            config,
            predictor,
        })
    }

    /// Load the artifact at `model_path` and build a pipeline
    pub fn load(config: AttritionConfig, model_path: &Path) -> Result<Self> {
        let predictor = Predictor::load(model_path)?;
        Self::new(config, predictor)
    }

    #[must_use]
    pub const fn config(&self) -> &AttritionConfig {
        &self.config
    }

    #[must_use]
    pub const fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    /// Score an uploaded delimited text body
    pub fn score_csv(&self, bytes: &[u8]) -> Result<ScoredTable> {
        parse_csv(bytes, &self.config)
            .and_then(|raw| self.score_batch(&raw))
            .inspect_err(log_request_failure)
    }

    /// Score a file on disk
    pub fn score_file(&self, path: &Path) -> Result<ScoredTable> {
        read_table(path, &self.config)
            .and_then(|raw| self.score_batch(&raw))
            .inspect_err(log_request_failure)
    }

    /// Align and score a raw table, appending the results to it
    pub fn score(&self, raw: &RecordBatch) -> Result<ScoredTable> {
        self.score_batch(raw).inspect_err(log_request_failure)
    }

    fn score_batch(&self, raw: &RecordBatch) -> Result<ScoredTable> {
        let (aligned, report) = self.aligner.align_with_report(raw)?;
        let mut predictions = self.predictor.predict(&aligned)?;

        if predictions.len() != raw.num_rows() {
            return Err(AttritionError::inference(format!(
                "{} predictions for {} rows",
                predictions.len(),
                raw.num_rows()
            )));
        }

        let decimals = i32::try_from(self.config.probability_decimals).unwrap_or(i32::MAX);
        for probability in &mut predictions.probabilities {
            *probability = round_to(*probability, decimals);
        }

        let table = self.append_predictions(raw, &predictions)?;
        Ok(ScoredTable {
            table,
            predictions,
            report,
            id_column: self.config.id_column.clone(),
            label_column: self.config.label_column.clone(),
            probability_column: self.config.probability_column.clone(),
        })
    }

    fn append_predictions(&self, raw: &RecordBatch, predictions: &Predictions) -> Result<RecordBatch> {
        let label_column = &self.config.label_column;
        let probability_column = &self.config.probability_column;

        // A re-uploaded result file gets fresh prediction columns
        let schema = raw.schema();
        let (mut fields, mut columns): (Vec<Field>, Vec<ArrayRef>) = schema
            .fields()
            .iter()
            .zip(raw.columns())
            .filter(|(field, _)| {
                field.name() != label_column && field.name() != probability_column
            })
            .map(|(field, column)| (field.as_ref().clone(), column.clone()))
            .unzip();

        let labels = label_array(self.predictor.classes(), &predictions.labels);
        fields.push(Field::new(label_column, labels.data_type().clone(), false));
        columns.push(labels);

        fields.push(Field::new(probability_column, DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(predictions.probabilities.clone())));

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
    }
}

/// The first `rows` rows of a raw upload, for showing before the results
#[must_use]
pub fn preview(raw: &RecordBatch, rows: usize) -> RecordBatch {
    raw.slice(0, rows.min(raw.num_rows()))
}

/// Integer labels stay numeric in the output; anything else is written as text
fn label_array(classes: &[ClassLabel; 2], labels: &[ClassLabel]) -> ArrayRef {
    let all_integer = classes.iter().all(|c| matches!(c, ClassLabel::Integer(_)));
    if all_integer {
        let values = labels
            .iter()
            .filter_map(|label| match label {
                ClassLabel::Integer(v) => Some(*v),
                ClassLabel::Text(_) => None,
            })
            .collect_vec();
        Arc::new(Int64Array::from(values))
    } else {
        let values = labels.iter().map(ToString::to_string).collect_vec();
        Arc::new(StringArray::from(values))
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
