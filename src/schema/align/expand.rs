//! Categorical expansion into indicator columns.

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray};
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::schema::features::indicator_name;
use crate::utils::arrow::to_string_array;

/// A named column, in table order
pub type NamedColumn = (String, ArrayRef);

/// Replace every categorical column with one indicator column per observed
/// category
///
/// Categories are taken from this input only and emitted in sorted order;
/// every category gets an indicator, none is dropped as a reference level.
/// Null cells are `false` in all indicators of their attribute. Returns the
/// expanded columns and the names of the generated indicators.
pub fn expand_categorical<S: AsRef<str>>(
    columns: Vec<NamedColumn>,
    categorical: &[S],
) -> Result<(Vec<NamedColumn>, Vec<String>)> {
    let categorical: FxHashSet<&str> = categorical.iter().map(AsRef::as_ref).collect();
    let mut expanded: Vec<(NamedColumn, bool)> = Vec::with_capacity(columns.len());
    let mut generated = Vec::new();

    for (name, array) in columns {
        if !categorical.contains(name.as_str()) {
            expanded.push(((name, array), false));
            continue;
        }

        let values = to_string_array(&array)?;
        let categories: BTreeSet<&str> = values.iter().flatten().collect();
        log::debug!(
            "Expanding '{name}' into {} indicator column(s)",
            categories.len()
        );

        for category in categories {
            let indicator: BooleanArray = values
                .iter()
                .map(|v| Some(v == Some(category)))
                .collect();
            let column_name = indicator_name(&name, category);
            generated.push(column_name.clone());
            expanded.push(((column_name, Arc::new(indicator) as ArrayRef), true));
        }
    }

    // A generated indicator takes precedence over a raw column of the same name
    let generated_set: FxHashSet<&str> = generated.iter().map(String::as_str).collect();
    let expanded: Vec<NamedColumn> = expanded
        .into_iter()
        .filter(|((name, _), is_generated)| {
            *is_generated || !generated_set.contains(name.as_str())
        })
        .map(|(column, _)| column)
        .collect();

    Ok((expanded, generated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int64Array, StringArray};

    fn bools(column: &ArrayRef) -> Vec<bool> {
        let array = column.as_any().downcast_ref::<BooleanArray>().unwrap();
        (0..array.len()).map(|i| array.value(i)).collect()
    }

    #[test]
    fn test_full_expansion_without_reference_level() {
        let columns = vec![
            ("Age".to_string(), Arc::new(Int64Array::from(vec![30, 40, 50])) as ArrayRef),
            (
                "OverTime".to_string(),
                Arc::new(StringArray::from(vec!["Yes", "No", "Yes"])) as ArrayRef,
            ),
        ];

        let (expanded, generated) = expand_categorical(columns, &["OverTime"]).unwrap();

        assert_eq!(generated, vec!["OverTime_No", "OverTime_Yes"]);
        let names: Vec<&str> = expanded.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Age", "OverTime_No", "OverTime_Yes"]);
        assert_eq!(bools(&expanded[1].1), vec![false, true, false]);
        assert_eq!(bools(&expanded[2].1), vec![true, false, true]);
    }

    #[test]
    fn test_nulls_produce_no_indicator() {
        let columns = vec![(
            "Gender".to_string(),
            Arc::new(StringArray::from(vec![Some("Male"), None])) as ArrayRef,
        )];

        let (expanded, generated) = expand_categorical(columns, &["Gender"]).unwrap();

        assert_eq!(generated, vec!["Gender_Male"]);
        assert_eq!(bools(&expanded[0].1), vec![true, false]);
    }

    #[test]
    fn test_absent_attribute_contributes_nothing() {
        let columns = vec![(
            "Age".to_string(),
            Arc::new(Int64Array::from(vec![30])) as ArrayRef,
        )];

        let (expanded, generated) = expand_categorical(columns, &["Department"]).unwrap();

        assert!(generated.is_empty());
        assert_eq!(expanded.len(), 1);
    }

    #[test]
    fn test_generated_indicator_replaces_raw_column() {
        let columns = vec![
            (
                "OverTime_Yes".to_string(),
                Arc::new(Int64Array::from(vec![0])) as ArrayRef,
            ),
            (
                "OverTime".to_string(),
                Arc::new(StringArray::from(vec!["Yes"])) as ArrayRef,
            ),
        ];

        let (expanded, _) = expand_categorical(columns, &["OverTime"]).unwrap();

        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].0, "OverTime_Yes");
        assert_eq!(bools(&expanded[0].1), vec![true]);
    }
}
