//! End-to-end pipeline tests on a temporary workspace.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use vintner_core::config::{
    DataIngestionConfig, DataSchema, DataTransformationConfig, DataValidationConfig,
    ElasticNetParams, ModelEvaluationConfig, ModelParams, ModelTrainerConfig, PipelineConfig,
    StageConfig,
};
use vintner_core::model::RegressionMetrics;
use vintner_core::{run_training_pipeline, PipelineError};

/// Synthetic wine-like dataset: quality is a noiseless linear function of
/// alcohol and sulphates so the fitted model has something to find.
fn dataset_csv(rows: usize, extra_column: bool) -> String {
    let mut csv = String::from(if extra_column {
        "alcohol,sulphates,color,quality\n"
    } else {
        "alcohol,sulphates,quality\n"
    });
    for i in 0..rows {
        let alcohol = 8.0 + (i % 9) as f64 * 0.4;
        let sulphates = 0.4 + (i % 5) as f64 * 0.08;
        let quality = 0.6 * alcohol + 2.0 * sulphates - 1.0;
        if extra_column {
            csv.push_str(&format!("{alcohol},{sulphates},red,{quality}\n"));
        } else {
            csv.push_str(&format!("{alcohol},{sulphates},{quality}\n"));
        }
    }
    csv
}

fn write_zip(path: &Path, csv: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file("winequality-red.csv", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(csv.as_bytes()).unwrap();
    writer.finish().unwrap();
}

fn workspace_config(root: &Path) -> PipelineConfig {
    let mut columns = BTreeMap::new();
    for (name, dtype) in [
        ("alcohol", "float"),
        ("sulphates", "float"),
        ("quality", "float"),
    ] {
        columns.insert(name.to_string(), dtype.to_string());
    }

    let ingestion_dir = root.join("data_ingestion");
    let data_file = ingestion_dir.join("winequality-red.csv");
    let split_dir = root.join("data_transformation");
    let model_file = root.join("model_trainer").join("model.json");

    PipelineConfig {
        stages: StageConfig {
            artifacts_root: root.to_path_buf(),
            data_ingestion: DataIngestionConfig {
                root_dir: ingestion_dir.clone(),
                // Never reachable; tests pre-place the archive.
                source_url: "http://127.0.0.1:1/never".into(),
                local_data_file: ingestion_dir.join("data.zip"),
                unzip_dir: ingestion_dir.clone(),
            },
            data_validation: DataValidationConfig {
                root_dir: root.join("data_validation"),
                data_file: data_file.clone(),
                status_file: root.join("data_validation").join("status.txt"),
            },
            data_transformation: DataTransformationConfig {
                root_dir: split_dir.clone(),
                data_file,
                test_fraction: 0.2,
                seed: 42,
            },
            model_trainer: ModelTrainerConfig {
                root_dir: root.join("model_trainer"),
                train_data_file: split_dir.join("train.csv"),
                model_file: model_file.clone(),
            },
            model_evaluation: ModelEvaluationConfig {
                root_dir: root.join("model_evaluation"),
                test_data_file: split_dir.join("test.csv"),
                model_file,
                metrics_file: root.join("model_evaluation").join("metrics.json"),
                tracking_uri: format!("file:{}", root.join("runs").display()),
                registry_model_name: "ElasticNetWineModel".into(),
            },
        },
        params: ModelParams {
            elastic_net: ElasticNetParams {
                alpha: 1e-4,
                l1_ratio: 0.5,
                max_iter: 5000,
                tol: 1e-8,
            },
        },
        schema: DataSchema {
            columns,
            target_column: "quality".into(),
        },
    }
}

fn prepare_archive(config: &PipelineConfig, csv: &str) {
    let ingestion = config.data_ingestion();
    std::fs::create_dir_all(&ingestion.root_dir).unwrap();
    write_zip(&ingestion.local_data_file, csv);
}

#[tokio::test]
async fn test_full_pipeline_produces_all_artifacts() {
    let dir = TempDir::new().unwrap();
    let config = workspace_config(dir.path());
    prepare_archive(&config, &dataset_csv(100, false));

    let metrics = run_training_pipeline(&config).await.unwrap();

    // Status artifact records the pass.
    assert_eq!(
        std::fs::read_to_string(&config.data_validation().status_file).unwrap(),
        "Validation status: True"
    );

    // Split sizes sum to the original row count at the configured ratio.
    let train = std::fs::read_to_string(dir.path().join("data_transformation/train.csv")).unwrap();
    let test = std::fs::read_to_string(dir.path().join("data_transformation/test.csv")).unwrap();
    assert_eq!(train.lines().count() - 1, 80);
    assert_eq!(test.lines().count() - 1, 20);

    // The target is a noiseless linear function, so the fit is near-exact.
    assert!(metrics.rmse < 0.05, "rmse was {}", metrics.rmse);
    assert!(metrics.r2 > 0.99, "r2 was {}", metrics.r2);

    // Metrics JSON matches the returned record.
    let persisted: RegressionMetrics =
        serde_json::from_str(&std::fs::read_to_string(&config.model_evaluation().metrics_file).unwrap())
            .unwrap();
    assert_eq!(persisted, metrics);

    // Exactly one tracking run, carrying the model artifact.
    let runs: Vec<_> = std::fs::read_dir(dir.path().join("runs"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(runs.len(), 1);
    assert!(runs[0].path().join("run.json").exists());
    assert!(runs[0].path().join("model.json").exists());
}

#[tokio::test]
async fn test_rerun_with_same_seed_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let config = workspace_config(dir.path());
    prepare_archive(&config, &dataset_csv(73, false));

    run_training_pipeline(&config).await.unwrap();
    let train_a = std::fs::read(dir.path().join("data_transformation/train.csv")).unwrap();
    let test_a = std::fs::read(dir.path().join("data_transformation/test.csv")).unwrap();

    run_training_pipeline(&config).await.unwrap();
    let train_b = std::fs::read(dir.path().join("data_transformation/train.csv")).unwrap();
    let test_b = std::fs::read(dir.path().join("data_transformation/test.csv")).unwrap();

    assert_eq!(train_a, train_b);
    assert_eq!(test_a, test_b);
}

#[tokio::test]
async fn test_unexpected_column_blocks_pipeline() {
    let dir = TempDir::new().unwrap();
    let config = workspace_config(dir.path());
    prepare_archive(&config, &dataset_csv(40, true));

    let err = run_training_pipeline(&config).await.unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));

    assert_eq!(
        std::fs::read_to_string(&config.data_validation().status_file).unwrap(),
        "Validation status: False"
    );
    // The gate stops the split from being written.
    assert!(!dir.path().join("data_transformation/train.csv").exists());
}

#[tokio::test]
async fn test_missing_archive_fails_ingestion() {
    let dir = TempDir::new().unwrap();
    let config = workspace_config(dir.path());
    // No archive prepared and the URL is unreachable.
    assert!(run_training_pipeline(&config).await.is_err());
}
