mod utils;

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use hr_attrition::{
    AttritionConfig, AttritionError, EXPECTED_FEATURES, FeatureAligner, align, parse_csv,
};
use utils::{employee_csv, employee_row, f64_column, record_batch, sample_csv};

fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

fn parse(csv: &str) -> RecordBatch {
    parse_csv(csv.as_bytes(), &AttritionConfig::default()).unwrap()
}

#[test]
fn test_columns_always_match_feature_list() {
    let inputs = vec![
        parse(&sample_csv()),
        record_batch(vec![(
            "Age",
            Arc::new(Int64Array::from(vec![30, 40])) as ArrayRef,
        )]),
        record_batch(vec![
            (
                "Hobby",
                Arc::new(StringArray::from(vec!["chess"])) as ArrayRef,
            ),
            (
                "Department",
                Arc::new(StringArray::from(vec!["Legal"])) as ArrayRef,
            ),
        ]),
    ];

    for raw in inputs {
        let aligned = align(&raw, &EXPECTED_FEATURES).unwrap();
        assert_eq!(column_names(&aligned), EXPECTED_FEATURES.to_vec());
        assert!(
            aligned
                .schema()
                .fields()
                .iter()
                .all(|f| f.data_type() == &DataType::Float64)
        );
        assert_eq!(aligned.num_rows(), raw.num_rows());
    }
}

#[test]
fn test_aligner_schema_describes_output() {
    let aligner = FeatureAligner::from_config(&AttritionConfig::default());
    let aligned = aligner.align(&parse(&sample_csv())).unwrap();

    assert_eq!(aligned.schema().as_ref(), aligner.schema().as_ref());
    assert_eq!(aligner.schema().fields().len(), EXPECTED_FEATURES.len());
}

#[test]
fn test_zero_rows_align_to_zero_rows() {
    let raw = parse(&employee_csv(&[]));
    assert_eq!(raw.num_rows(), 0);

    let aligned = align(&raw, &EXPECTED_FEATURES).unwrap();

    assert_eq!(aligned.num_rows(), 0);
    assert_eq!(aligned.num_columns(), EXPECTED_FEATURES.len());
}

#[test]
fn test_known_categories_set_indicators() {
    let raw = parse(&employee_csv(&[employee_row(1, 30, "Yes", "Sales Executive")]));
    let aligned = align(&raw, &EXPECTED_FEATURES).unwrap();

    assert_eq!(f64_column(&aligned, "OverTime_Yes"), vec![1.0]);
    assert_eq!(f64_column(&aligned, "JobRole_Sales Executive"), vec![1.0]);
    for role in EXPECTED_FEATURES
        .iter()
        .filter(|f| f.starts_with("JobRole_") && **f != "JobRole_Sales Executive")
    {
        assert_eq!(f64_column(&aligned, role), vec![0.0], "{role}");
    }
    assert_eq!(f64_column(&aligned, "Age"), vec![30.0]);
    assert_eq!(f64_column(&aligned, "MonthlyIncome"), vec![5993.0]);
    assert_eq!(f64_column(&aligned, "Department_Sales"), vec![1.0]);
    assert_eq!(f64_column(&aligned, "EducationField_Life Sciences"), vec![1.0]);
    assert_eq!(f64_column(&aligned, "Gender_Male"), vec![0.0]);
    assert_eq!(f64_column(&aligned, "MaritalStatus_Single"), vec![1.0]);
}

#[test]
fn test_unseen_category_is_all_zero() {
    let raw = parse(&employee_csv(&[employee_row(1, 30, "No", "Astronaut")]));
    let aligned = align(&raw, &EXPECTED_FEATURES).unwrap();

    for role in EXPECTED_FEATURES.iter().filter(|f| f.starts_with("JobRole_")) {
        assert_eq!(f64_column(&aligned, role), vec![0.0], "{role}");
    }
    assert_eq!(f64_column(&aligned, "OverTime_Yes"), vec![0.0]);
}

#[test]
fn test_missing_categorical_column_is_all_zero() {
    let raw = record_batch(vec![
        ("EmployeeId", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
        ("Age", Arc::new(Int64Array::from(vec![30, 50])) as ArrayRef),
        (
            "JobRole",
            Arc::new(StringArray::from(vec!["Manager", "Sales Executive"])) as ArrayRef,
        ),
    ]);

    let aligned = align(&raw, &EXPECTED_FEATURES).unwrap();

    for department in EXPECTED_FEATURES
        .iter()
        .filter(|f| f.starts_with("Department_"))
    {
        assert_eq!(f64_column(&aligned, department), vec![0.0, 0.0]);
    }
    assert_eq!(f64_column(&aligned, "JobRole_Manager"), vec![1.0, 0.0]);
    assert_eq!(f64_column(&aligned, "Age"), vec![30.0, 50.0]);
    // Base attributes absent from the upload are zero-filled too
    assert_eq!(f64_column(&aligned, "MonthlyIncome"), vec![0.0, 0.0]);
}

#[test]
fn test_row_order_is_preserved() {
    let raw = parse(&sample_csv());
    let aligned = align(&raw, &EXPECTED_FEATURES).unwrap();

    assert_eq!(f64_column(&aligned, "Age"), vec![28.0, 45.0, 45.0]);
    assert_eq!(f64_column(&aligned, "OverTime_Yes"), vec![1.0, 0.0, 1.0]);
    assert_eq!(
        f64_column(&aligned, "JobRole_Research Scientist"),
        vec![0.0, 1.0, 0.0]
    );
}

#[test]
fn test_realigning_aligned_table_is_identity() {
    let aligned = align(&parse(&sample_csv()), &EXPECTED_FEATURES).unwrap();

    // Superset of the feature list: an identifier and an unrelated column
    let mut fields: Vec<Field> = aligned
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    let mut columns: Vec<ArrayRef> = aligned.columns().to_vec();
    fields.insert(0, Field::new("EmployeeId", DataType::Int64, false));
    columns.insert(0, Arc::new(Int64Array::from(vec![1, 2, 3])));
    fields.push(Field::new("Notes", DataType::Float64, false));
    columns.push(Arc::new(Float64Array::from(vec![9.0, 9.0, 9.0])));
    let superset = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap();

    assert_eq!(align(&aligned, &EXPECTED_FEATURES).unwrap(), aligned);
    assert_eq!(align(&superset, &EXPECTED_FEATURES).unwrap(), aligned);
}

#[test]
fn test_non_numeric_feature_is_schema_error() {
    let raw = record_batch(vec![(
        "Age",
        Arc::new(StringArray::from(vec!["30", "unknown"])) as ArrayRef,
    )]);

    let err = align(&raw, &EXPECTED_FEATURES).unwrap_err();

    assert!(matches!(err, AttritionError::Schema(ref msg) if msg.contains("Age")));
}

#[test]
fn test_numeric_categorical_values_are_expanded() {
    let raw = record_batch(vec![(
        "OverTime",
        Arc::new(Int64Array::from(vec![1, 0])) as ArrayRef,
    )]);

    let aligned = align(&raw, &["OverTime_1", "OverTime_0"]).unwrap();

    assert_eq!(f64_column(&aligned, "OverTime_1"), vec![1.0, 0.0]);
    assert_eq!(f64_column(&aligned, "OverTime_0"), vec![0.0, 1.0]);
}
