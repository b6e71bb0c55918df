//! Model evaluation — scores the test split and records a tracking run.

use crate::config::ModelEvaluationConfig;
use crate::data::frame::DataFrame;
use crate::error::PipelineError;
use crate::model::elastic_net::ElasticNet;
use crate::model::metrics::RegressionMetrics;
use crate::tracking::{TrackingRun, TrackingStore};

/// Evaluates the serialized model on the test CSV.
pub struct ModelEvaluation {
    config: ModelEvaluationConfig,
    target_column: String,
}

impl ModelEvaluation {
    pub fn new(config: ModelEvaluationConfig, target_column: String) -> Self {
        Self {
            config,
            target_column,
        }
    }

    /// Compute metrics, persist them as JSON, and log the run.
    pub async fn evaluate(&self) -> Result<RegressionMetrics, PipelineError> {
        let mut frame = DataFrame::read_csv(&self.config.test_data_file)?;
        let model = ElasticNet::load(&self.config.model_file)?;

        let actual: Vec<f64> = frame
            .drop_column(&self.target_column)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64().ok_or_else(|| {
                    PipelineError::evaluation(format!(
                        "Non-numeric target at row {i} in column '{}'",
                        self.target_column
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        let predicted = model.predict(&frame)?;
        let metrics = RegressionMetrics::compute(&actual, &predicted)?;

        crate::artifacts::atomic_write_json(&self.config.metrics_file, &metrics)?;
        tracing::info!(
            rmse = metrics.rmse,
            mae = metrics.mae,
            r2 = metrics.r2,
            file = %self.config.metrics_file.display(),
            "Evaluation metrics saved"
        );

        let store = TrackingStore::from_uri(&self.config.tracking_uri);
        let mut run = TrackingRun::new("model_evaluation").with_params(model.param_map());
        run.log_metric("rmse", metrics.rmse);
        run.log_metric("mae", metrics.mae);
        run.log_metric("r2", metrics.r2);
        run.log_model(&self.config.model_file)?;
        store
            .log_run(&run, &self.config.registry_model_name)
            .await?;

        Ok(metrics)
    }
}
