//! Linear pipeline orchestration.
//!
//! Stages run strictly in order; a failing stage is logged at its boundary
//! and the error propagates unchanged (no retries, no recovery).

use crate::config::PipelineConfig;
use crate::data::{DataIngestion, DataTransformation, DataValidation};
use crate::error::PipelineError;
use crate::model::{ModelEvaluation, ModelTrainer, RegressionMetrics};

/// One step of the training pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DataIngestion,
    DataValidation,
    DataTransformation,
    ModelTrainer,
    ModelEvaluation,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::DataIngestion,
        Stage::DataValidation,
        Stage::DataTransformation,
        Stage::ModelTrainer,
        Stage::ModelEvaluation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::DataIngestion => "Data Ingestion",
            Stage::DataValidation => "Data Validation",
            Stage::DataTransformation => "Data Transformation",
            Stage::ModelTrainer => "Model Trainer",
            Stage::ModelEvaluation => "Model Evaluation",
        }
    }

    pub fn parse(name: &str) -> Option<Stage> {
        match name {
            "ingestion" => Some(Stage::DataIngestion),
            "validation" => Some(Stage::DataValidation),
            "transformation" => Some(Stage::DataTransformation),
            "training" => Some(Stage::ModelTrainer),
            "evaluation" => Some(Stage::ModelEvaluation),
            _ => None,
        }
    }
}

/// Run the full training pipeline in-process.
///
/// Returns the evaluation metrics of the freshly trained model.
pub async fn run_training_pipeline(
    config: &PipelineConfig,
) -> Result<RegressionMetrics, PipelineError> {
    run_stage_logged(Stage::DataIngestion, async {
        DataIngestion::new(config.data_ingestion().clone()).run().await
    })
    .await?;

    let report = run_stage_logged(Stage::DataValidation, async {
        DataValidation::new(config.data_validation().clone(), config.schema.clone())
            .validate_all_columns()
    })
    .await?;

    run_stage_logged(Stage::DataTransformation, async {
        DataTransformation::new(config.data_transformation().clone()).train_test_split(&report)
    })
    .await?;

    run_stage_logged(Stage::ModelTrainer, async {
        ModelTrainer::new(
            config.model_trainer().clone(),
            config.params.elastic_net.clone(),
            config.schema.target_column.clone(),
        )
        .train()
    })
    .await?;

    run_stage_logged(Stage::ModelEvaluation, async {
        ModelEvaluation::new(
            config.model_evaluation().clone(),
            config.schema.target_column.clone(),
        )
        .evaluate()
        .await
    })
    .await
}

/// Run a single stage by itself.
///
/// Validation is re-run before transformation so the gate still applies when
/// stages are invoked one at a time.
pub async fn run_stage(config: &PipelineConfig, stage: Stage) -> Result<(), PipelineError> {
    match stage {
        Stage::DataIngestion => {
            run_stage_logged(stage, async {
                DataIngestion::new(config.data_ingestion().clone()).run().await
            })
            .await
        }
        Stage::DataValidation => {
            run_stage_logged(stage, async {
                DataValidation::new(config.data_validation().clone(), config.schema.clone())
                    .validate_all_columns()
                    .map(|_| ())
            })
            .await
        }
        Stage::DataTransformation => {
            run_stage_logged(stage, async {
                let report =
                    DataValidation::new(config.data_validation().clone(), config.schema.clone())
                        .validate_all_columns()?;
                DataTransformation::new(config.data_transformation().clone())
                    .train_test_split(&report)
                    .map(|_| ())
            })
            .await
        }
        Stage::ModelTrainer => {
            run_stage_logged(stage, async {
                ModelTrainer::new(
                    config.model_trainer().clone(),
                    config.params.elastic_net.clone(),
                    config.schema.target_column.clone(),
                )
                .train()
                .map(|_| ())
            })
            .await
        }
        Stage::ModelEvaluation => {
            run_stage_logged(stage, async {
                ModelEvaluation::new(
                    config.model_evaluation().clone(),
                    config.schema.target_column.clone(),
                )
                .evaluate()
                .await
                .map(|_| ())
            })
            .await
        }
    }
}

async fn run_stage_logged<T>(
    stage: Stage,
    fut: impl std::future::Future<Output = Result<T, PipelineError>>,
) -> Result<T, PipelineError> {
    tracing::info!(stage = stage.name(), ">>>>>> stage started <<<<<<");
    match fut.await {
        Ok(value) => {
            tracing::info!(stage = stage.name(), ">>>>>> stage completed <<<<<<");
            Ok(value)
        }
        Err(e) => {
            tracing::error!(stage = stage.name(), error = %e, "Stage failed");
            Err(e)
        }
    }
}
