//! # vintner-core — wine-quality regression pipeline
//!
//! A linear training pipeline over a tabular dataset: ingestion, schema
//! validation, train/test split, ElasticNet fitting, evaluation with
//! experiment tracking, and a small axum web layer for retraining and
//! predictions.
//!
//! Stages hand each other CSV artifacts on disk; each stage is a pure
//! function of its input files and its config record. Orchestration lives in
//! [`pipeline::run_training_pipeline`].

pub mod artifacts;
pub mod config;
pub mod data;
pub mod error;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod server;
pub mod tracking;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use inference::PredictionPipeline;
pub use pipeline::{run_stage, run_training_pipeline, Stage};
