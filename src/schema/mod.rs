//! Feature schema of the attrition classifier and alignment of raw tables to it.

pub mod align;
pub mod features;

pub use align::{AlignmentReport, FeatureAligner, align};
pub use features::{
    CATEGORICAL_COLUMNS, DROP_COLUMNS, EXPECTED_FEATURES, ID_COLUMN, feature_schema,
    indicator_name,
};
