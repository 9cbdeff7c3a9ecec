//! The fixed feature schema of the attrition classifier.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema};

/// Identifier column carried through to the result view
pub const ID_COLUMN: &str = "EmployeeId";

/// Administrative, identifier and label columns removed before alignment
pub const DROP_COLUMNS: [&str; 5] = [
    "EmployeeId",
    "Attrition",
    "EmployeeCount",
    "Over18",
    "StandardHours",
];

/// Categorical attributes expanded into indicator columns
pub const CATEGORICAL_COLUMNS: [&str; 7] = [
    "BusinessTravel",
    "Department",
    "EducationField",
    "Gender",
    "JobRole",
    "MaritalStatus",
    "OverTime",
];

/// Ordered feature names the classifier was trained on
pub const EXPECTED_FEATURES: [&str; 44] = [
    "Age",
    "DailyRate",
    "DistanceFromHome",
    "Education",
    "EnvironmentSatisfaction",
    "HourlyRate",
    "JobInvolvement",
    "JobLevel",
    "JobSatisfaction",
    "MonthlyIncome",
    "MonthlyRate",
    "NumCompaniesWorked",
    "PercentSalaryHike",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "StockOptionLevel",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "WorkLifeBalance",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
    "BusinessTravel_Travel_Frequently",
    "BusinessTravel_Travel_Rarely",
    "Department_Research & Development",
    "Department_Sales",
    "EducationField_Life Sciences",
    "EducationField_Marketing",
    "EducationField_Medical",
    "EducationField_Other",
    "EducationField_Technical Degree",
    "Gender_Male",
    "JobRole_Human Resources",
    "JobRole_Laboratory Technician",
    "JobRole_Manager",
    "JobRole_Manufacturing Director",
    "JobRole_Research Director",
    "JobRole_Research Scientist",
    "JobRole_Sales Executive",
    "JobRole_Sales Representative",
    "MaritalStatus_Married",
    "MaritalStatus_Single",
    "OverTime_Yes",
];

/// Name of the indicator column for one category of an attribute
#[must_use]
pub fn indicator_name(attribute: &str, category: &str) -> String {
    format!("{attribute}_{category}")
}

/// Build the Arrow schema of the aligned feature table
///
/// Every feature is a non-nullable `Float64` column, in list order.
#[must_use]
pub fn feature_schema<S: AsRef<str>>(features: &[S]) -> Arc<Schema> {
    let fields: Vec<Field> = features
        .iter()
        .map(|name| Field::new(name.as_ref(), DataType::Float64, false))
        .collect();
    Arc::new(Schema::new(fields))
}
