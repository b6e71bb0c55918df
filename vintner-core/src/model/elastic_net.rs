//! ElasticNet regression fit by coordinate descent.
//!
//! Features are standardized before fitting and the scaling is stored with
//! the model, so `predict` accepts raw feature values. The objective matches
//! the usual parameterization: squared error plus `alpha * l1_ratio` L1 and
//! `alpha * (1 - l1_ratio)` L2 penalties.

use crate::config::ElasticNetParams;
use crate::data::frame::DataFrame;
use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A fitted ElasticNet regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticNet {
    pub params: ElasticNetParams,
    pub feature_names: Vec<String>,
    /// Coefficients in the standardized feature space.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub feature_means: Vec<f64>,
    pub feature_stds: Vec<f64>,
    pub trained_at: DateTime<Utc>,
}

impl ElasticNet {
    /// Fit on a row-major feature matrix and target vector.
    pub fn fit(
        features: &[Vec<f64>],
        target: &[f64],
        feature_names: Vec<String>,
        params: &ElasticNetParams,
    ) -> Result<Self, PipelineError> {
        let n = features.len();
        if n == 0 || n != target.len() {
            return Err(PipelineError::training(format!(
                "Feature/target size mismatch: {} rows vs {} targets",
                n,
                target.len()
            )));
        }
        let p = feature_names.len();
        if features.iter().any(|row| row.len() != p) {
            return Err(PipelineError::training(
                "Feature matrix width does not match feature names",
            ));
        }

        let (means, stds) = column_moments(features, p);
        let x = standardize(features, &means, &stds);
        let y_mean = target.iter().sum::<f64>() / n as f64;

        let l1 = params.alpha * params.l1_ratio;
        let l2 = params.alpha * (1.0 - params.l1_ratio);

        let mut coef = vec![0.0; p];
        let mut residual: Vec<f64> = target.iter().map(|&t| t - y_mean).collect();

        for _ in 0..params.max_iter {
            let mut max_delta: f64 = 0.0;
            for j in 0..p {
                // Partial residual correlation with column j. Columns are
                // standardized, so the per-column normalizer is 1.
                let mut rho = 0.0;
                for i in 0..n {
                    rho += x[i][j] * (residual[i] + x[i][j] * coef[j]);
                }
                rho /= n as f64;

                let updated = soft_threshold(rho, l1) / (1.0 + l2);
                let delta = updated - coef[j];
                if delta != 0.0 {
                    for i in 0..n {
                        residual[i] -= x[i][j] * delta;
                    }
                    coef[j] = updated;
                }
                max_delta = max_delta.max(delta.abs());
            }
            if max_delta < params.tol {
                break;
            }
        }

        Ok(Self {
            params: params.clone(),
            feature_names,
            coefficients: coef,
            intercept: y_mean,
            feature_means: means,
            feature_stds: stds,
            trained_at: Utc::now(),
        })
    }

    /// Predict from a raw (unstandardized) row-major feature matrix whose
    /// columns are in `feature_names` order.
    pub fn predict_matrix(&self, features: &[Vec<f64>]) -> Vec<f64> {
        features
            .iter()
            .map(|row| {
                let mut y = self.intercept;
                for (j, &v) in row.iter().enumerate() {
                    y += self.coefficients[j] * (v - self.feature_means[j]) / self.feature_stds[j];
                }
                y
            })
            .collect()
    }

    /// Predict from a frame, aligning columns by stored feature name.
    /// A missing or non-numeric feature column surfaces as a dataset error.
    pub fn predict(&self, frame: &DataFrame) -> Result<Vec<f64>, PipelineError> {
        let matrix = frame.numeric_matrix(&self.feature_names)?;
        Ok(self.predict_matrix(&matrix))
    }

    /// Serialize to disk (atomic JSON write).
    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        crate::artifacts::atomic_write_json(path, self)?;
        tracing::info!(path = %path.display(), "Model saved");
        Ok(())
    }

    /// Load a previously serialized model.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        crate::artifacts::load_json(path)?
            .ok_or_else(|| PipelineError::not_found(format!("Model file {}", path.display())))
    }

    /// Hyperparameters as a flat name → value map, for tracking runs.
    pub fn param_map(&self) -> Vec<(String, String)> {
        vec![
            ("alpha".to_string(), self.params.alpha.to_string()),
            ("l1_ratio".to_string(), self.params.l1_ratio.to_string()),
            ("max_iter".to_string(), self.params.max_iter.to_string()),
            ("tol".to_string(), self.params.tol.to_string()),
        ]
    }
}

fn column_moments(features: &[Vec<f64>], p: usize) -> (Vec<f64>, Vec<f64>) {
    let n = features.len() as f64;
    let mut means = vec![0.0; p];
    for row in features {
        for (j, &v) in row.iter().enumerate() {
            means[j] += v;
        }
    }
    for m in &mut means {
        *m /= n;
    }

    let mut stds = vec![0.0; p];
    for row in features {
        for (j, &v) in row.iter().enumerate() {
            stds[j] += (v - means[j]).powi(2);
        }
    }
    for s in &mut stds {
        *s = (*s / n).sqrt();
        // Constant columns standardize to zero; keep the divisor finite.
        if *s == 0.0 {
            *s = 1.0;
        }
    }
    (means, stds)
}

fn standardize(features: &[Vec<f64>], means: &[f64], stds: &[f64]) -> Vec<Vec<f64>> {
    features
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, &v)| (v - means[j]) / stds[j])
                .collect()
        })
        .collect()
}

fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}
