//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use hr_attrition::{AttritionConfig, EXPECTED_FEATURES, PredictionPipeline};
use serde_json::json;

/// Header of a full employee export, administrative columns included
pub const HEADER: &str = "Age,Attrition,BusinessTravel,DailyRate,Department,DistanceFromHome,\
Education,EducationField,EmployeeCount,EmployeeId,EnvironmentSatisfaction,Gender,HourlyRate,\
JobInvolvement,JobLevel,JobRole,JobSatisfaction,MaritalStatus,MonthlyIncome,MonthlyRate,\
NumCompaniesWorked,Over18,OverTime,PercentSalaryHike,PerformanceRating,RelationshipSatisfaction,\
StandardHours,StockOptionLevel,TotalWorkingYears,TrainingTimesLastYear,WorkLifeBalance,\
YearsAtCompany,YearsInCurrentRole,YearsSinceLastPromotion,YearsWithCurrManager";

/// One employee row matching [`HEADER`]
pub fn employee_row(id: u32, age: u32, overtime: &str, job_role: &str) -> String {
    format!(
        "{age},No,Travel_Rarely,1102,Sales,1,2,Life Sciences,1,{id},2,Female,94,3,2,\
{job_role},4,Single,5993,19479,8,Y,{overtime},11,3,1,80,0,8,0,1,6,4,0,5"
    )
}

/// A CSV upload with the given rows
pub fn employee_csv(rows: &[String]) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    csv
}

/// Three employees covering overtime, age and an unseen job role
pub fn sample_csv() -> String {
    employee_csv(&[
        employee_row(1, 28, "Yes", "Sales Executive"),
        employee_row(2, 45, "No", "Research Scientist"),
        employee_row(3, 45, "Yes", "Astronaut"),
    ])
}

/// Build a record batch from named columns
pub fn record_batch(columns: Vec<(&str, ArrayRef)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
        .collect();
    let arrays = columns.into_iter().map(|(_, array)| array).collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).expect("valid test batch")
}

/// Values of a `Float64` column by name
pub fn f64_column(batch: &RecordBatch, name: &str) -> Vec<f64> {
    let idx = batch.schema().index_of(name).expect("column exists");
    let column = batch
        .column(idx)
        .as_any()
        .downcast_ref::<Float64Array>()
        .expect("Float64 column");
    column.values().to_vec()
}

fn stump(feature: usize, threshold: f64, left: [f64; 2], right: [f64; 2]) -> serde_json::Value {
    json!({
        "children_left": [1, -1, -1],
        "children_right": [2, -1, -1],
        "feature": [feature, -2, -2],
        "threshold": [threshold, -2.0, -2.0],
        "value": [[1.0, 1.0], left, right]
    })
}

/// Two-tree forest over the standard feature list
///
/// Tree one splits on `OverTime_Yes` (0.2 / 0.7), tree two on `Age <= 30`
/// (0.6 / 0.1), so overtime at 28 scores 0.65 and no overtime at 45 scores
/// 0.15.
pub fn forest_artifact() -> serde_json::Value {
    let overtime = EXPECTED_FEATURES
        .iter()
        .position(|f| *f == "OverTime_Yes")
        .expect("OverTime_Yes is a feature");

    json!({
        "kind": "random_forest",
        "classes": [0, 1],
        "n_features": EXPECTED_FEATURES.len(),
        "feature_names": EXPECTED_FEATURES.to_vec(),
        "trees": [
            stump(overtime, 0.5, [0.8, 0.2], [0.3, 0.7]),
            stump(0, 30.0, [0.4, 0.6], [0.9, 0.1])
        ]
    })
}

/// Single-tree forest whose every row scores one third
pub fn one_third_artifact() -> serde_json::Value {
    json!({
        "kind": "random_forest",
        "classes": ["No", "Yes"],
        "n_features": EXPECTED_FEATURES.len(),
        "trees": [stump(0, 1000.0, [2.0, 1.0], [2.0, 1.0])]
    })
}

/// Write an artifact into `dir` and return its path
pub fn write_artifact(dir: &Path, artifact: &serde_json::Value) -> PathBuf {
    let path = dir.join("attrition_model.json");
    std::fs::write(&path, artifact.to_string()).expect("write artifact");
    path
}

/// Pipeline over the two-tree forest
pub fn forest_pipeline(dir: &Path) -> PredictionPipeline {
    let path = write_artifact(dir, &forest_artifact());
    PredictionPipeline::load(AttritionConfig::default(), &path).expect("pipeline loads")
}
