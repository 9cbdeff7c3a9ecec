//! Arrow helpers for turning raw upload columns into strings and floats.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;

use crate::error::{AttritionError, Result};

/// Render any column as a `StringArray`, keeping nulls
///
/// Numeric and boolean columns use Arrow's display casting, so `1` becomes
/// `"1"` and `true` becomes `"true"`.
pub fn to_string_array(array: &ArrayRef) -> Result<StringArray> {
    let casted = match array.data_type() {
        DataType::Utf8 => array.clone(),
        _ => cast::cast(array, &DataType::Utf8)?,
    };

    casted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| AttritionError::schema("Column could not be read as text"))
}

/// Convert a feature column to `Float64`
///
/// Values that cannot be parsed as numbers and empty cells both surface as a
/// schema error naming the column, since the classifier has no way to score
/// them.
pub fn to_float64(name: &str, array: &ArrayRef) -> Result<ArrayRef> {
    // Header-only uploads infer untyped columns
    if array.is_empty() {
        return Ok(zeros(0));
    }

    let converted = match array.data_type() {
        DataType::Float64 => array.clone(),
        DataType::Utf8 | DataType::LargeUtf8 => {
            let trimmed = trim_strings(array)?;
            cast::cast(&trimmed, &DataType::Float64)?
        }
        DataType::Null => {
            return Err(AttritionError::schema(format!(
                "Feature column '{name}' has no values"
            )));
        }
        _ => cast::cast(array, &DataType::Float64).map_err(|e| {
            AttritionError::schema(format!(
                "Feature column '{name}' of type {:?} is not numeric: {e}",
                array.data_type()
            ))
        })?,
    };

    let invalid = converted.null_count();
    if invalid > 0 {
        let first = (0..converted.len())
            .find(|&i| converted.is_null(i))
            .unwrap_or_default();
        return Err(AttritionError::schema(format!(
            "Feature column '{name}' has {invalid} empty or non-numeric value(s), first at row {}",
            first + 1
        )));
    }

    Ok(converted)
}

/// A `Float64` column of `len` zeros
#[must_use]
pub fn zeros(len: usize) -> ArrayRef {
    Arc::new(Float64Array::from(vec![0.0; len]))
}

/// Borrow a column as `Float64Array`
pub fn as_float64<'a>(name: &str, array: &'a ArrayRef) -> Result<&'a Float64Array> {
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| {
            AttritionError::inference(format!(
                "Column '{name}' is {:?}, expected Float64",
                array.data_type()
            ))
        })
}

fn trim_strings(array: &ArrayRef) -> Result<ArrayRef> {
    let strings = to_string_array(array)?;
    let trimmed: StringArray = strings.iter().map(|v| v.map(str::trim)).collect();
    Ok(Arc::new(trimmed))
}
