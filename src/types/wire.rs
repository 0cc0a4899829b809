//! Request and response bodies of the inference server routes.

use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocab_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_model_loaded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asthma_model_loaded: Option<bool>,
}

impl HealthStatus {
    /// Server is up and its intent model is loaded.
    pub fn is_ready(&self) -> bool {
        self.status == "ok" && self.model_loaded
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest<'a> {
    pub message: &'a str,
    pub user_id: &'a str,
}

/// Reply of `POST /predict`.
///
/// Only `response` is required; the rest is diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collecting_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl PredictResponse {
    /// Human-readable intent line, e.g. `greeting (97.3%)`.
    ///
    /// A zero confidence is treated as absent.
    pub fn intent_summary(&self) -> String {
        let intent = self.intent.as_deref().unwrap_or("undefined");
        match self.confidence {
            Some(c) if c != 0.0 => format!("{} ({:.1}%)", intent, c * 100.0),
            _ => intent.to_string(),
        }
    }

    pub fn is_collecting_data(&self) -> bool {
        self.collecting_data == Some(true)
    }
}

/// Body of `POST /reset_session`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetRequest<'a> {
    pub user_id: &'a str,
}

/// Reply of `POST /reset_session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub message: String,
}
