//! Experiment tracking — records training runs locally or on a remote server.
//!
//! The destination is chosen from the tracking URI scheme: `http(s)://` talks
//! to a tracking server over REST, anything else is treated as a local file
//! store. The local store never registers models; registration only makes
//! sense against a remote registry.

use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One recorded experiment execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingRun {
    pub id: String,
    pub name: String,
    pub params: Vec<(String, String)>,
    pub metrics: Vec<(String, f64)>,
    /// Local path of the model artifact logged with the run.
    pub model_artifact: Option<PathBuf>,
    /// SHA-256 of the model artifact, recorded for provenance.
    pub model_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TrackingRun {
    pub fn new(name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            params: Vec::new(),
            metrics: Vec::new(),
            model_artifact: None,
            model_hash: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn log_metric(&mut self, name: &str, value: f64) {
        self.metrics.push((name.to_string(), value));
    }

    /// Attach a model artifact; its hash is captured at logging time so the
    /// run records exactly which serialized model it scored.
    pub fn log_model(&mut self, path: &Path) -> Result<(), PipelineError> {
        self.model_hash = Some(crate::artifacts::hash_file(path)?);
        self.model_artifact = Some(path.to_path_buf());
        Ok(())
    }
}

/// Where runs are recorded.
#[derive(Debug, Clone)]
pub enum TrackingStore {
    LocalFs { root: PathBuf },
    Remote { base_url: String },
}

impl TrackingStore {
    /// Select a store from a tracking URI.
    ///
    /// `http://` and `https://` URIs select the remote store. A `file:` URI
    /// or a bare path selects the local store.
    pub fn from_uri(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            Self::Remote {
                base_url: uri.trim_end_matches('/').to_string(),
            }
        } else {
            let path = uri.strip_prefix("file://").or_else(|| uri.strip_prefix("file:")).unwrap_or(uri);
            Self::LocalFs {
                root: PathBuf::from(path),
            }
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::LocalFs { .. })
    }

    /// Record a completed run. Model registration is skipped on the local
    /// store even when the run carries a model artifact.
    pub async fn log_run(
        &self,
        run: &TrackingRun,
        registry_model_name: &str,
    ) -> Result<(), PipelineError> {
        match self {
            Self::LocalFs { root } => {
                let run_dir = root.join(&run.id);
                crate::artifacts::atomic_write_json(&run_dir.join("run.json"), run)?;
                if let Some(model) = &run.model_artifact {
                    std::fs::copy(model, run_dir.join("model.json")).map_err(|e| {
                        PipelineError::tracking(format!(
                            "Failed to copy model artifact {}: {e}",
                            model.display()
                        ))
                    })?;
                }
                tracing::info!(run_id = %run.id, dir = %run_dir.display(), "Run logged to local store");
                Ok(())
            }
            Self::Remote { base_url } => {
                let client = reqwest::Client::new();
                post(
                    &client,
                    &format!("{base_url}/api/runs/create"),
                    &serde_json::json!({ "run_id": run.id, "run_name": run.name }),
                )
                .await?;
                for (key, value) in &run.params {
                    post(
                        &client,
                        &format!("{base_url}/api/runs/log-parameter"),
                        &serde_json::json!({ "run_id": run.id, "key": key, "value": value }),
                    )
                    .await?;
                }
                for (key, value) in &run.metrics {
                    post(
                        &client,
                        &format!("{base_url}/api/runs/log-metric"),
                        &serde_json::json!({ "run_id": run.id, "key": key, "value": value }),
                    )
                    .await?;
                }
                if let Some(model) = &run.model_artifact {
                    let payload: serde_json::Value =
                        crate::artifacts::load_json(model)?.ok_or_else(|| {
                            PipelineError::not_found(format!("Model file {}", model.display()))
                        })?;
                    post(
                        &client,
                        &format!("{base_url}/api/runs/log-model"),
                        &serde_json::json!({
                            "run_id": run.id,
                            "registered_model_name": registry_model_name,
                            "model": payload,
                        }),
                    )
                    .await?;
                }
                tracing::info!(run_id = %run.id, server = %base_url, "Run logged to tracking server");
                Ok(())
            }
        }
    }
}

async fn post(
    client: &reqwest::Client,
    url: &str,
    body: &serde_json::Value,
) -> Result<(), PipelineError> {
    let response = client.post(url).json(body).send().await?;
    response
        .error_for_status()
        .map_err(|e| PipelineError::tracking(format!("Tracking call {url} failed: {e}")))?;
    Ok(())
}
