//! Projection of an expanded table onto the fixed feature schema.

use arrow::array::ArrayRef;
use arrow::datatypes::Schema;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::schema::align::expand::NamedColumn;
use crate::utils::arrow::{to_float64, zeros};

/// Outcome of reconciling against the feature schema
#[derive(Debug)]
pub struct Reconciled {
    /// Table with exactly the target schema
    pub batch: RecordBatch,
    /// Target features that were absent and filled with zeros
    pub zero_filled: Vec<String>,
    /// Input columns that are not part of the target schema
    pub discarded: Vec<String>,
}

/// Convert expanded columns to match the target schema
///
/// Each target field is taken from the column of the same name, converted to
/// `Float64`, or created as zeros when absent. Columns not named by the
/// target schema are discarded.
pub fn reconcile(
    columns: &[NamedColumn],
    target_schema: &Arc<Schema>,
    num_rows: usize,
) -> Result<Reconciled> {
    let by_name: FxHashMap<&str, &ArrayRef> = columns
        .iter()
        .map(|(name, array)| (name.as_str(), array))
        .collect();

    let mut adapted_columns: Vec<ArrayRef> = Vec::with_capacity(target_schema.fields().len());
    let mut zero_filled = Vec::new();

    for target_field in target_schema.fields() {
        let field_name = target_field.name();
        if let Some(source) = by_name.get(field_name.as_str()) {
            adapted_columns.push(to_float64(field_name, source)?);
        } else {
            zero_filled.push(field_name.clone());
            adapted_columns.push(zeros(num_rows));
        }
    }

    let discarded = columns
        .iter()
        .filter(|(name, _)| target_schema.index_of(name).is_err())
        .map(|(name, _)| name.clone())
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    let batch = RecordBatch::try_new_with_options(target_schema.clone(), adapted_columns, &options)?;

    Ok(Reconciled {
        batch,
        zero_filled,
        discarded,
    })
}
