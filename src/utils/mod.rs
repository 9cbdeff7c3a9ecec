//! Shared helpers for Arrow data and logging.

pub mod arrow;
pub mod logging;
