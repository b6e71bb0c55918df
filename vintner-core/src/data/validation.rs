//! Data validation — schema column check gating the rest of the pipeline.

use crate::config::{DataSchema, DataValidationConfig};
use crate::data::frame::DataFrame;
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Outcome of the validation stage.
///
/// The boolean is also persisted to the status file as a text artifact, but
/// downstream stages gate on this value rather than re-parsing the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    /// Data columns not present in the schema.
    pub unexpected_columns: Vec<String>,
}

/// Validates the ingested CSV against the configured schema.
pub struct DataValidation {
    config: DataValidationConfig,
    schema: DataSchema,
}

impl DataValidation {
    pub fn new(config: DataValidationConfig, schema: DataSchema) -> Self {
        Self { config, schema }
    }

    /// Compare the data's column set against the schema.
    ///
    /// The check is one-directional: a data column missing from the schema
    /// fails validation, while schema columns absent from the data are not
    /// checked. This mirrors the long-standing behavior the rest of the
    /// pipeline was built around.
    pub fn validate_all_columns(&self) -> Result<ValidationReport, PipelineError> {
        let frame = DataFrame::read_csv(&self.config.data_file)?;

        let unexpected_columns: Vec<String> = frame
            .columns
            .iter()
            .filter(|c| !self.schema.columns.contains_key(*c))
            .cloned()
            .collect();
        let passed = unexpected_columns.is_empty();

        self.write_status(passed)?;
        if passed {
            tracing::info!(columns = frame.column_count(), "Data validation passed");
        } else {
            tracing::warn!(?unexpected_columns, "Data validation failed");
        }

        Ok(ValidationReport {
            passed,
            unexpected_columns,
        })
    }

    fn write_status(&self, passed: bool) -> Result<(), PipelineError> {
        let text = format!(
            "Validation status: {}",
            if passed { "True" } else { "False" }
        );
        crate::artifacts::atomic_write(&self.config.status_file, text.as_bytes())?;
        Ok(())
    }
}
