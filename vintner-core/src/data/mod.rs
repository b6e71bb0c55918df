//! Data engineering stages: ingestion, tabular container, validation, split.

pub mod frame;
pub mod ingestion;
pub mod transformation;
pub mod validation;

pub use frame::DataFrame;
pub use ingestion::DataIngestion;
pub use transformation::{DataTransformation, SplitArtifacts};
pub use validation::{DataValidation, ValidationReport};
