//! Model trainer — fits the regressor on the training split.

use crate::config::{ElasticNetParams, ModelTrainerConfig};
use crate::data::frame::DataFrame;
use crate::error::PipelineError;
use crate::model::elastic_net::ElasticNet;

/// Fits an ElasticNet on the train CSV and serializes it.
pub struct ModelTrainer {
    config: ModelTrainerConfig,
    params: ElasticNetParams,
    target_column: String,
}

impl ModelTrainer {
    pub fn new(config: ModelTrainerConfig, params: ElasticNetParams, target_column: String) -> Self {
        Self {
            config,
            params,
            target_column,
        }
    }

    pub fn train(&self) -> Result<ElasticNet, PipelineError> {
        let mut frame = DataFrame::read_csv(&self.config.train_data_file)?;
        let target_cells = frame.drop_column(&self.target_column).map_err(|_| {
            PipelineError::training(format!(
                "Target column '{}' not found in training data",
                self.target_column
            ))
        })?;
        let target: Vec<f64> = target_cells
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64().ok_or_else(|| {
                    PipelineError::training(format!(
                        "Non-numeric target at row {i} in column '{}'",
                        self.target_column
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        let feature_names = frame.columns.clone();
        let features = frame.numeric_matrix(&feature_names)?;

        tracing::info!(
            rows = features.len(),
            features = feature_names.len(),
            alpha = self.params.alpha,
            l1_ratio = self.params.l1_ratio,
            "Fitting ElasticNet"
        );
        let model = ElasticNet::fit(&features, &target, feature_names, &self.params)?;

        std::fs::create_dir_all(&self.config.root_dir)?;
        model.save(&self.config.model_file)?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn train_config(dir: &std::path::Path) -> ModelTrainerConfig {
        ModelTrainerConfig {
            root_dir: dir.join("trainer"),
            train_data_file: dir.join("train.csv"),
            model_file: dir.join("trainer").join("model.json"),
        }
    }

    fn params() -> ElasticNetParams {
        ElasticNetParams {
            alpha: 1e-6,
            l1_ratio: 0.5,
            max_iter: 5000,
            tol: 1e-8,
        }
    }

    #[test]
    fn test_train_writes_model_file() {
        let dir = TempDir::new().unwrap();
        let mut csv = String::from("alcohol,ph,quality\n");
        for i in 0..30 {
            let a = 8.0 + (i % 7) as f64 * 0.3;
            let p = 3.0 + (i % 5) as f64 * 0.1;
            csv.push_str(&format!("{a},{p},{}\n", 0.8 * a - 1.2 * p + 2.0));
        }
        std::fs::write(dir.path().join("train.csv"), csv).unwrap();

        let trainer = ModelTrainer::new(train_config(dir.path()), params(), "quality".into());
        let model = trainer.train().unwrap();
        assert_eq!(model.feature_names, vec!["alcohol", "ph"]);
        assert!(dir.path().join("trainer").join("model.json").exists());

        let loaded = ElasticNet::load(&dir.path().join("trainer").join("model.json")).unwrap();
        assert_eq!(loaded.coefficients, model.coefficients);
    }

    #[test]
    fn test_missing_target_column() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("train.csv"), "alcohol,ph\n9.4,3.5\n").unwrap();
        let trainer = ModelTrainer::new(train_config(dir.path()), params(), "quality".into());
        assert!(trainer.train().is_err());
    }

    #[test]
    fn test_missing_train_file() {
        let dir = TempDir::new().unwrap();
        let trainer = ModelTrainer::new(train_config(dir.path()), params(), "quality".into());
        assert!(trainer.train().is_err());
    }
}
