//! Arrow data handling utilities

pub mod conversion;

pub use conversion::{as_float64, to_float64, to_string_array, zeros};
