//! Alignment of uploaded employee tables to the classifier's feature schema.
//!
//! Alignment runs in three steps:
//!
//! 1. administrative columns (identifier, label, constant columns) are dropped;
//! 2. categorical attributes are expanded into one indicator column per
//!    category observed in this input;
//! 3. the result is projected onto the Expected Feature List, zero-filling
//!    absent features and discarding everything else.
//!
//! The output always has the input's rows, in order, and exactly the expected
//! columns, in order, all as `Float64`.

pub mod expand;
pub mod reconcile;

use std::sync::Arc;

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::config::AttritionConfig;
use crate::error::{AttritionError, Result};
use crate::schema::features::{CATEGORICAL_COLUMNS, DROP_COLUMNS, feature_schema};

pub use expand::{NamedColumn, expand_categorical};
pub use reconcile::{Reconciled, reconcile};

/// What alignment did to an input table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    /// Administrative columns removed in step 1
    pub dropped: Vec<String>,
    /// Indicator columns created in step 2
    pub generated: Vec<String>,
    /// Expected features absent from the input and set to zero
    pub zero_filled: Vec<String>,
    /// Columns present after step 2 that the classifier does not use
    pub discarded: Vec<String>,
}

/// Aligns raw record sets to a fixed, ordered feature list
#[derive(Debug, Clone)]
pub struct FeatureAligner {
    drop_columns: Vec<String>,
    categorical_columns: Vec<String>,
    schema: Arc<Schema>,
}

impl FeatureAligner {
    /// Create an aligner with the standard exclusion set and categorical
    /// attributes
    #[must_use]
    pub fn new<S: AsRef<str>>(expected_features: &[S]) -> Self {
        Self {
            drop_columns: DROP_COLUMNS.iter().map(ToString::to_string).collect(),
            categorical_columns: CATEGORICAL_COLUMNS.iter().map(ToString::to_string).collect(),
            schema: feature_schema(expected_features),
        }
    }

    /// Create an aligner from configuration
    #[must_use]
    pub fn from_config(config: &AttritionConfig) -> Self {
        Self {
            drop_columns: config.drop_columns.clone(),
            categorical_columns: config.categorical_columns.clone(),
            schema: feature_schema(&config.expected_features),
        }
    }

    /// Schema of every table this aligner produces
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Align `raw` to the feature schema
    pub fn align(&self, raw: &RecordBatch) -> Result<RecordBatch> {
        self.align_with_report(raw).map(|(batch, _)| batch)
    }

    /// Align `raw` and describe what changed
    pub fn align_with_report(&self, raw: &RecordBatch) -> Result<(RecordBatch, AlignmentReport)> {
        if raw.num_columns() == 0 {
            return Err(AttritionError::schema("Input table has no columns"));
        }

        let num_rows = raw.num_rows();
        let (kept, dropped) = self.drop_administrative(raw);
        let (expanded, generated) = expand_categorical(kept, &self.categorical_columns)?;
        let Reconciled {
            batch,
            zero_filled,
            discarded,
        } = reconcile(&expanded, &self.schema, num_rows)?;

        let report = AlignmentReport {
            dropped,
            generated,
            zero_filled,
            discarded,
        };
        log_report(&report, num_rows);

        Ok((batch, report))
    }

    fn drop_administrative(&self, raw: &RecordBatch) -> (Vec<NamedColumn>, Vec<String>) {
        let drop: FxHashSet<&str> = self.drop_columns.iter().map(String::as_str).collect();
        let schema = raw.schema();
        let mut kept = Vec::with_capacity(raw.num_columns());
        let mut dropped = Vec::new();

        for (field, column) in schema.fields().iter().zip(raw.columns()) {
            if drop.contains(field.name().as_str()) {
                dropped.push(field.name().clone());
            } else {
                kept.push((field.name().clone(), column.clone()));
            }
        }

        (kept, dropped)
    }
}

/// Align `raw_records` to `expected_features` with the standard exclusion set
/// and categorical attributes
pub fn align<S: AsRef<str>>(raw_records: &RecordBatch, expected_features: &[S]) -> Result<RecordBatch> {
    FeatureAligner::new(expected_features).align(raw_records)
}

fn log_report(report: &AlignmentReport, num_rows: usize) {
    log::debug!(
        "Aligned {num_rows} rows: dropped {:?}, generated {:?}",
        report.dropped,
        report.generated
    );
    if !report.zero_filled.is_empty() {
        log::info!(
            "Zero-filled {} feature(s) absent from input: {}",
            report.zero_filled.len(),
            report.zero_filled.join(", ")
        );
    }
    if !report.discarded.is_empty() {
        log::info!(
            "Discarded {} column(s) not used by the model: {}",
            report.discarded.len(),
            report.discarded.join(", ")
        );
    }
}
