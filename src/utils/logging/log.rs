//! Logging utilities
//!
//! Standardized log lines for operations on uploaded files and artifacts.

use std::path::Path;
use std::time::Duration;

/// Log an operation start with consistent format
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log a finished step over employee rows
///
/// # Arguments
/// * `operation` - Past-tense verb, e.g. "Read" or "Scored"
/// * `rows` - Number of employee rows handled
/// * `source` - Upload, file or model artifact involved
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    rows: usize,
    source: &str,
    elapsed: Option<Duration>,
) {
    log::info!("{}", completion_message(operation, rows, source, elapsed));
}

fn completion_message(
    operation: &str,
    rows: usize,
    source: &str,
    elapsed: Option<Duration>,
) -> String {
    let noun = if rows == 1 { "employee row" } else { "employee rows" };
    match elapsed {
        Some(duration) => format!("{operation} {rows} {noun} ({source}) in {duration:?}"),
        None => format!("{operation} {rows} {noun} ({source})"),
    }
}

/// Log a failure of one upload-and-predict cycle
///
/// Inference failures point at drift between the feature list and the model,
/// so they are reported at error level; input problems are only warnings.
pub fn log_request_failure(error: &crate::error::AttritionError) {
    if error.is_user_input() {
        log::warn!("[{}] {error}", error.kind());
    } else {
        log::error!("[{}] {error}", error.kind());
    }
}
