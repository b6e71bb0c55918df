//! Model training, persistence, metrics, and evaluation.

pub mod elastic_net;
pub mod evaluation;
pub mod metrics;
pub mod trainer;

pub use elastic_net::ElasticNet;
pub use evaluation::ModelEvaluation;
pub use metrics::RegressionMetrics;
pub use trainer::ModelTrainer;
