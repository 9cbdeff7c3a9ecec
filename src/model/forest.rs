//! Random forest of binary decision trees.
//!
//! Trees use the flat array layout produced by common tree exporters: node
//! `i` is a leaf when `children_left[i] == -1`, otherwise rows with
//! `x[feature[i]] <= threshold[i]` go to `children_left[i]` and the rest to
//! `children_right[i]`. `value[i]` holds the class weights at the node.

use serde::{Deserialize, Serialize};

use super::{Classifier, FeatureMatrix};

/// Marker for "no child" in the flat tree layout
pub const LEAF: i64 = -1;

/// A single fitted decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    /// Check that the tree is well formed for `n_features` inputs and two
    /// classes
    ///
    /// Children must come after their parent, which rules out cycles and
    /// guarantees traversal terminates.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        let n_nodes = self.children_left.len();
        if n_nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n_nodes)
        {
            return Err("tree arrays have different lengths".to_string());
        }

        for node in 0..n_nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                let weights = &self.value[node];
                if weights.len() != 2 {
                    return Err(format!(
                        "leaf {node} has {} class weights, expected 2",
                        weights.len()
                    ));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0)
                    || weights.iter().sum::<f64>() <= 0.0
                {
                    return Err(format!("leaf {node} has invalid class weights"));
                }
                continue;
            }

            for child in [left, right] {
                let valid = usize::try_from(child).is_ok_and(|c| c > node && c < n_nodes);
                if !valid {
                    return Err(format!("node {node} has invalid child {child}"));
                }
            }
            let valid_feature =
                usize::try_from(self.feature[node]).is_ok_and(|f| f < n_features);
            if !valid_feature {
                return Err(format!(
                    "node {node} splits on feature {} outside 0..{n_features}",
                    self.feature[node]
                ));
            }
        }

        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `row`
    fn leaf_distribution(&self, row: &[f64]) -> [f64; 2] {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            // Indices were checked in `validate`
            let feature = self.feature[node] as usize;
            let next = if row[feature] <= self.threshold[node] {
                self.children_left[node]
            } else {
                self.children_right[node]
            };
            node = next as usize;
        }

        let weights = &self.value[node];
        let total = weights[0] + weights[1];
        [weights[0] / total, weights[1] / total]
    }
}

/// Soft-voting ensemble of decision trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Validate every tree against `n_features`
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    /// Mean class distribution over all trees
    fn distribution(&self, row: &[f64]) -> [f64; 2] {
        let mut sum = [0.0; 2];
        for tree in &self.trees {
            let [p0, p1] = tree.leaf_distribution(row);
            sum[0] += p0;
            sum[1] += p1;
        }
        let n = self.trees.len() as f64;
        [sum[0] / n, sum[1] / n]
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &FeatureMatrix) -> Vec<usize> {
        features
            .rows()
            .map(|row| {
                let [p0, p1] = self.distribution(row);
                // Ties go to the first class
                usize::from(p1 > p0)
            })
            .collect()
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Vec<f64> {
        features
            .rows()
            .map(|row| self.distribution(row)[1])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits on feature 0 at 0.5: left leaf favours class 0, right class 1
    fn stump(left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, LEAF, LEAF],
            children_right: vec![2, LEAF, LEAF],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![1.0, 1.0], left.to_vec(), right.to_vec()],
        }
    }

    #[test]
    fn test_soft_voting() {
        let forest = RandomForest {
            trees: vec![stump([9.0, 1.0], [2.0, 8.0]), stump([7.0, 3.0], [4.0, 6.0])],
        };
        forest.validate(1).unwrap();

        let features = FeatureMatrix::new(vec![0.0, 1.0], 1).unwrap();
        let proba = forest.predict_proba(&features);

        assert!((proba[0] - 0.2).abs() < 1e-12);
        assert!((proba[1] - 0.7).abs() < 1e-12);
        assert_eq!(forest.predict(&features), vec![0, 1]);
    }

    #[test]
    fn test_threshold_is_inclusive_on_the_left() {
        let forest = RandomForest {
            trees: vec![stump([1.0, 0.0], [0.0, 1.0])],
        };
        let features = FeatureMatrix::new(vec![0.5], 1).unwrap();
        assert_eq!(forest.predict(&features), vec![0]);
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        let forest = RandomForest {
            trees: vec![stump([1.0, 1.0], [1.0, 1.0])],
        };
        let features = FeatureMatrix::new(vec![0.0], 1).unwrap();
        assert_eq!(forest.predict(&features), vec![0]);
        assert!((forest.predict_proba(&features)[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut tree = stump([1.0, 0.0], [0.0, 1.0]);
        tree.children_left[0] = 0;
        assert!(tree.validate(1).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        let tree = stump([1.0, 0.0], [0.0, 1.0]);
        assert!(tree.validate(0).is_err());
    }
}
