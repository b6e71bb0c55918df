//! Configuration types for the training pipeline.
//!
//! Three YAML files drive a run: `config.yaml` (per-stage paths rooted at the
//! artifacts directory), `params.yaml` (model hyperparameters), and
//! `schema.yaml` (expected columns plus the regression target). They are read
//! once by [`PipelineConfig::load`] and handed to stages as owned records.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level pipeline configuration, assembled from the three YAML files.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub stages: StageConfig,
    pub params: ModelParams,
    pub schema: DataSchema,
}

impl PipelineConfig {
    /// Load `config.yaml`, `params.yaml`, and `schema.yaml` from a directory.
    pub fn load(config_dir: &Path) -> Result<Self, PipelineError> {
        let stages: StageConfig = read_yaml(&config_dir.join("config.yaml"))?;
        let params: ModelParams = read_yaml(&config_dir.join("params.yaml"))?;
        let schema: DataSchema = read_yaml(&config_dir.join("schema.yaml"))?;
        tracing::info!(dir = %config_dir.display(), "Pipeline configuration loaded");
        Ok(Self {
            stages,
            params,
            schema,
        })
    }

    pub fn data_ingestion(&self) -> &DataIngestionConfig {
        &self.stages.data_ingestion
    }

    pub fn data_validation(&self) -> &DataValidationConfig {
        &self.stages.data_validation
    }

    pub fn data_transformation(&self) -> &DataTransformationConfig {
        &self.stages.data_transformation
    }

    pub fn model_trainer(&self) -> &ModelTrainerConfig {
        &self.stages.model_trainer
    }

    pub fn model_evaluation(&self) -> &ModelEvaluationConfig {
        &self.stages.model_evaluation
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::config(format!("Failed to read {}: {e}", path.display())))?;
    serde_yaml::from_str(&content)
        .map_err(|e| PipelineError::config(format!("Failed to parse {}: {e}", path.display())))
}

/// Contents of `config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(default = "default_artifacts_root")]
    pub artifacts_root: PathBuf,
    pub data_ingestion: DataIngestionConfig,
    pub data_validation: DataValidationConfig,
    pub data_transformation: DataTransformationConfig,
    pub model_trainer: ModelTrainerConfig,
    pub model_evaluation: ModelEvaluationConfig,
}

fn default_artifacts_root() -> PathBuf {
    PathBuf::from("artifacts")
}

/// Data ingestion stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataIngestionConfig {
    pub root_dir: PathBuf,
    /// URL of the zip archive containing the raw dataset CSV.
    pub source_url: String,
    /// Where the downloaded archive is stored locally.
    pub local_data_file: PathBuf,
    /// Directory the archive is extracted into.
    pub unzip_dir: PathBuf,
}

/// Data validation stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataValidationConfig {
    pub root_dir: PathBuf,
    /// The ingested CSV to validate.
    pub data_file: PathBuf,
    /// Text artifact recording the pass/fail outcome.
    pub status_file: PathBuf,
}

/// Data transformation stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTransformationConfig {
    pub root_dir: PathBuf,
    pub data_file: PathBuf,
    /// Fraction of rows held out for the test split.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed for the split shuffle; re-runs with the same seed are
    /// byte-identical.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

/// Model trainer stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTrainerConfig {
    pub root_dir: PathBuf,
    pub train_data_file: PathBuf,
    pub model_file: PathBuf,
}

/// Model evaluation stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEvaluationConfig {
    pub root_dir: PathBuf,
    pub test_data_file: PathBuf,
    pub model_file: PathBuf,
    pub metrics_file: PathBuf,
    /// Tracking destination. A `file:` URI (or bare path) selects the local
    /// store; `http(s)://` selects the remote store.
    #[serde(default = "default_tracking_uri")]
    pub tracking_uri: String,
    /// Name the model is registered under on a remote tracking server.
    #[serde(default = "default_registry_model_name")]
    pub registry_model_name: String,
}

fn default_tracking_uri() -> String {
    "file:artifacts/runs".to_string()
}

fn default_registry_model_name() -> String {
    "ElasticNetWineModel".to_string()
}

/// Contents of `params.yaml` — ElasticNet hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    pub elastic_net: ElasticNetParams,
}

/// ElasticNet hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticNetParams {
    /// Overall regularization strength.
    pub alpha: f64,
    /// Mix between L1 (1.0) and L2 (0.0) penalties.
    pub l1_ratio: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tol")]
    pub tol: f64,
}

fn default_max_iter() -> usize {
    1000
}

fn default_tol() -> f64 {
    1e-4
}

/// Contents of `schema.yaml` — expected columns and the regression target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSchema {
    /// Column name → dtype label. Only the key set participates in
    /// validation; dtype labels are documentation.
    pub columns: BTreeMap<String, String>,
    pub target_column: String,
}
