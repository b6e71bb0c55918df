//! Data transformation — seeded train/test split.

use crate::config::DataTransformationConfig;
use crate::data::frame::DataFrame;
use crate::data::validation::ValidationReport;
use crate::error::PipelineError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::PathBuf;

/// Paths of the split files produced by the stage.
#[derive(Debug, Clone)]
pub struct SplitArtifacts {
    pub train_file: PathBuf,
    pub test_file: PathBuf,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Splits the validated dataset into train and test CSVs.
pub struct DataTransformation {
    config: DataTransformationConfig,
}

impl DataTransformation {
    pub fn new(config: DataTransformationConfig) -> Self {
        Self { config }
    }

    /// Run the split, gated on the validation outcome.
    pub fn train_test_split(
        &self,
        report: &ValidationReport,
    ) -> Result<SplitArtifacts, PipelineError> {
        if !report.passed {
            return Err(PipelineError::validation(
                "Data validation failed, cannot proceed to data transformation",
            ));
        }

        let frame = DataFrame::read_csv(&self.config.data_file)?;
        tracing::info!(shape = ?frame.shape(), "Read data for transformation");

        let (train, test) = split_frame(&frame, self.config.test_fraction, self.config.seed);

        std::fs::create_dir_all(&self.config.root_dir)?;
        let train_file = self.config.root_dir.join("train.csv");
        let test_file = self.config.root_dir.join("test.csv");
        train.write_csv(&train_file)?;
        test.write_csv(&test_file)?;

        tracing::info!(
            train = train.row_count(),
            test = test.row_count(),
            "Train and test sets saved"
        );

        Ok(SplitArtifacts {
            train_file,
            test_file,
            train_rows: train.row_count(),
            test_rows: test.row_count(),
        })
    }
}

/// Shuffle row indices with a seeded RNG and carve off the test block first,
/// so the same seed always yields the same two frames.
fn split_frame(frame: &DataFrame, test_fraction: f64, seed: u64) -> (DataFrame, DataFrame) {
    let mut indices: Vec<usize> = (0..frame.row_count()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = (frame.row_count() as f64 * test_fraction).round() as usize;
    let (test_idx, train_idx) = indices.split_at(test_size.min(indices.len()));

    let take = |idx: &[usize]| DataFrame {
        columns: frame.columns.clone(),
        rows: idx.iter().map(|&i| frame.rows[i].clone()).collect(),
    };
    (take(train_idx), take(test_idx))
}
