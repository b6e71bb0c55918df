//! Web layer built on axum: home page, `/train`, and `/predict`.
//!
//! `/train` runs the pipeline in-process under a timeout instead of shelling
//! out to a separate process. `/predict` converts any failure into an HTTP
//! 400 with a JSON error envelope; there is no auth or rate limiting.

use crate::config::PipelineConfig;
use crate::data::frame::DataFrame;
use crate::inference::PredictionPipeline;
use crate::pipeline::run_training_pipeline;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

/// Shared state for the web handlers.
pub struct AppState {
    pub config: PipelineConfig,
    /// Upper bound on an in-process `/train` run.
    pub train_timeout: Duration,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            train_timeout: Duration::from_secs(30 * 60),
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Build the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/train", get(train_handler))
        .route("/predict", post(predict_handler))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(addr: &str, state: SharedState) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Web layer listening");
    axum::serve(listener, app).await
}

async fn home_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Synchronous from the caller's perspective: the response is sent only once
/// the full pipeline run has finished or failed.
async fn train_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match tokio::time::timeout(state.train_timeout, run_training_pipeline(&state.config)).await {
        Ok(Ok(metrics)) => format!(
            "Training completed. rmse={:.4} mae={:.4} r2={:.4}",
            metrics.rmse, metrics.mae, metrics.r2
        ),
        Ok(Err(e)) => format!("Training failed: {e}"),
        Err(_) => format!(
            "Training failed: timed out after {}s",
            state.train_timeout.as_secs()
        ),
    }
}

/// Body is parsed by hand so every failure mode funnels into the same
/// `{"error": ..., "status": "failed"}` envelope.
async fn predict_handler(State(state): State<SharedState>, body: String) -> impl IntoResponse {
    match predict(&state, &body) {
        Ok(predictions) => (
            StatusCode::OK,
            axum::Json(serde_json::json!({
                "prediction": predictions,
                "status": "success",
            })),
        ),
        Err(message) => (
            StatusCode::BAD_REQUEST,
            axum::Json(serde_json::json!({
                "error": message,
                "status": "failed",
            })),
        ),
    }
}

fn predict(state: &AppState, body: &str) -> Result<Vec<f64>, String> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| format!("Invalid JSON body: {e}"))?;
    let records = value
        .as_array()
        .ok_or_else(|| "Expected a JSON array of feature records".to_string())?;
    let frame = DataFrame::from_records(records).map_err(|e| e.to_string())?;

    let pipeline = PredictionPipeline::new(&state.config.model_evaluation().model_file)
        .map_err(|e| e.to_string())?;
    pipeline.predict(&frame).map_err(|e| e.to_string())
}

static INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Wine Quality Prediction</title></head>
<body>
  <h1>Wine Quality Prediction</h1>
  <p>POST a JSON array of feature records to <code>/predict</code>,
     or <a href="/train">trigger a training run</a>.</p>
  <form id="predict-form">
    <textarea name="records" rows="8" cols="60">
[{"fixed acidity": 7.4, "volatile acidity": 0.7, "citric acid": 0.0,
  "residual sugar": 1.9, "chlorides": 0.076, "free sulfur dioxide": 11.0,
  "total sulfur dioxide": 34.0, "density": 0.9978, "pH": 3.51,
  "sulphates": 0.56, "alcohol": 9.4}]</textarea>
    <br/><button type="submit">Predict</button>
  </form>
  <pre id="result"></pre>
  <script>
    document.getElementById('predict-form').addEventListener('submit', async (e) => {
      e.preventDefault();
      const body = e.target.records.value;
      const resp = await fetch('/predict', {
        method: 'POST',
        headers: {'Content-Type': 'application/json'},
        body,
      });
      document.getElementById('result').textContent = await resp.text();
    });
  </script>
</body>
</html>
"#;
