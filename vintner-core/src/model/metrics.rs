//! Regression metrics.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Error metrics for a regression model on a held-out set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    /// Compute RMSE, MAE, and R² from actual and predicted values.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self, PipelineError> {
        if actual.is_empty() || actual.len() != predicted.len() {
            return Err(PipelineError::evaluation(format!(
                "Metric inputs mismatched: {} actual vs {} predicted",
                actual.len(),
                predicted.len()
            )));
        }
        let n = actual.len() as f64;

        let mse = actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| (a - p).powi(2))
            .sum::<f64>()
            / n;
        let mae = actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| (a - p).abs())
            .sum::<f64>()
            / n;

        let mean = actual.iter().sum::<f64>() / n;
        let ss_tot = actual.iter().map(|a| (a - mean).powi(2)).sum::<f64>();
        let ss_res = actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| (a - p).powi(2))
            .sum::<f64>();
        // A constant target makes R² undefined; report 0 like a mean model.
        let r2 = if ss_tot == 0.0 { 0.0 } else { 1.0 - ss_res / ss_tot };

        Ok(Self {
            rmse: mse.sqrt(),
            mae,
            r2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let actual = [3.0, 5.0, 7.0];
        let metrics = RegressionMetrics::compute(&actual, &actual).unwrap();
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.r2, 1.0);
    }

    #[test]
    fn test_known_values() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [1.5, 2.5, 2.5, 4.5];
        let metrics = RegressionMetrics::compute(&actual, &predicted).unwrap();
        assert!((metrics.mae - 0.5).abs() < 1e-12);
        assert!((metrics.rmse - 0.5).abs() < 1e-12);
        // ss_tot = 5.0, ss_res = 1.0
        assert!((metrics.r2 - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_lengths() {
        let err = RegressionMetrics::compute(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, PipelineError::Evaluation(_)));
    }
}
