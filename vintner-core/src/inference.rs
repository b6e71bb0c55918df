//! Prediction pipeline used by the web layer.

use crate::data::frame::DataFrame;
use crate::error::PipelineError;
use crate::model::elastic_net::ElasticNet;
use std::path::Path;

/// Wraps a trained model loaded once at construction.
///
/// Input is passed straight to the model; malformed input surfaces as the
/// model's own error rather than a validation layer here.
pub struct PredictionPipeline {
    model: ElasticNet,
}

impl PredictionPipeline {
    pub fn new(model_path: &Path) -> Result<Self, PipelineError> {
        let model = ElasticNet::load(model_path)?;
        tracing::info!(path = %model_path.display(), "Model loaded for prediction");
        Ok(Self { model })
    }

    pub fn predict(&self, data: &DataFrame) -> Result<Vec<f64>, PipelineError> {
        tracing::debug!(shape = ?data.shape(), "Making prediction");
        self.model.predict(data)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.model.feature_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ElasticNetParams;
    use tempfile::TempDir;

    #[test]
    fn test_predict_after_load() {
        let dir = TempDir::new().unwrap();
        let features: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i * 3 % 7) as f64]).collect();
        let target: Vec<f64> = features.iter().map(|r| r[0] + 2.0 * r[1]).collect();
        let model = ElasticNet::fit(
            &features,
            &target,
            vec!["a".into(), "b".into()],
            &ElasticNetParams {
                alpha: 1e-6,
                l1_ratio: 0.5,
                max_iter: 5000,
                tol: 1e-8,
            },
        )
        .unwrap();
        let path = dir.path().join("model.json");
        model.save(&path).unwrap();

        let pipeline = PredictionPipeline::new(&path).unwrap();
        let frame = DataFrame::from_records(&[serde_json::json!({"a": 2.0, "b": 3.0})]).unwrap();
        let predictions = pipeline.predict(&frame).unwrap();
        assert_eq!(predictions.len(), 1);
        assert!((predictions[0] - 8.0).abs() < 0.1);
    }

    #[test]
    fn test_missing_model_fails_construction() {
        let dir = TempDir::new().unwrap();
        assert!(PredictionPipeline::new(&dir.path().join("absent.json")).is_err());
    }
}
