//! Logging utilities

pub mod log;

pub use self::log::{log_operation_complete, log_operation_start, log_request_failure};
