//! Logistic regression classifier.

use serde::{Deserialize, Serialize};

use super::{Classifier, FeatureMatrix};

const fn default_threshold() -> f64 {
    0.5
}

/// Linear model with a logistic link and its own decision threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Rows whose probability is strictly above this value get the positive class
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticRegression {
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "{} coefficients for {n_features} features",
                self.coefficients.len()
            ));
        }
        if !self.coefficients.iter().all(|c| c.is_finite()) || !self.intercept.is_finite() {
            return Err("coefficients must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("threshold {} outside [0, 1]", self.threshold));
        }
        Ok(())
    }

    fn probability(&self, row: &[f64]) -> f64 {
        let score: f64 = self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        1.0 / (1.0 + (-score).exp())
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &FeatureMatrix) -> Vec<usize> {
        features
            .rows()
            .map(|row| usize::from(self.probability(row) > self.threshold))
            .collect()
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Vec<f64> {
        features.rows().map(|row| self.probability(row)).collect()
    }
}
