//! Reading uploaded employee tables into Arrow record batches.
//!
//! Uploads are delimited text with a header row. Parquet files are accepted
//! from the command line as well. Anything that cannot be parsed into a
//! rectangular table is reported as a schema error.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::AttritionConfig;
use crate::error::{AttritionError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Read a table from `path`, choosing the format by file extension
pub fn read_table(path: &Path, config: &AttritionConfig) -> Result<RecordBatch> {
    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        read_parquet(path)
    } else {
        read_csv(path, config)
    }
}

/// Read a delimited text file into a single record batch
pub fn read_csv(path: &Path, config: &AttritionConfig) -> Result<RecordBatch> {
    let start = Instant::now();
    log_operation_start("Reading CSV file", path);

    let bytes = std::fs::read(path)?;
    let batch = parse_csv(&bytes, config)?;

    log_operation_complete(
        "Read",
        batch.num_rows(),
        &path.display().to_string(),
        Some(start.elapsed()),
    );
    Ok(batch)
}

/// Parse uploaded delimited text into a single record batch
///
/// Column types are inferred over every record, so a late float or text cell
/// widens the column instead of failing the read. Rows with a different
/// number of fields than the header make the whole upload invalid.
pub fn parse_csv(bytes: &[u8], config: &AttritionConfig) -> Result<RecordBatch> {
    let format = Format::default()
        .with_header(true)
        .with_delimiter(config.delimiter_byte());

    let (schema, _) = format
        .infer_schema(Cursor::new(bytes), None)
        .map_err(|e| AttritionError::schema(format!("Input is not a readable table: {e}")))?;
    let schema: SchemaRef = Arc::new(schema);

    if schema.fields().is_empty() {
        return Err(AttritionError::schema("Input has no header row"));
    }

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_delimiter(config.delimiter_byte())
        .build(Cursor::new(bytes))
        .map_err(|e| AttritionError::schema(format!("Input is not a readable table: {e}")))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| AttritionError::schema(format!("Inconsistent rows in input: {e}")))?;

    Ok(concat_batches(&schema, &batches)?)
}

/// Read a Parquet file into a single record batch
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
        AttritionError::schema(format!("Failed to read parquet file {}: {e}", path.display()))
    })?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| AttritionError::schema(format!("Failed to decode parquet data: {e}")))?;
    let batch = concat_batches(&schema, &batches)?;

    log_operation_complete(
        "Read",
        batch.num_rows(),
        &path.display().to_string(),
        Some(start.elapsed()),
    );
    Ok(batch)
}
