//! HTTP client for the hosted keypoint-detection workflow.

use std::path::Path;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use super::response::{parse_workflow_response, Detection};

/// Default serverless workflow endpoint.
pub const DEFAULT_BASE_URL: &str = "https://serverless.roboflow.com";

/// Default request timeout in seconds. Keypoint workflows can take a while on
/// cold start.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Detection client errors.
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Failed to read image: {0}")]
    ImageRead(String),
}

/// Configuration for the detection workflow.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub base_url: String,
    pub api_key: String,
    pub workspace: String,
    pub workflow_id: String,
    pub timeout_secs: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            workspace: String::new(),
            workflow_id: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DetectorConfig {
    /// Set a custom API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the workspace name.
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = workspace.into();
        self
    }

    /// Set the workflow id.
    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = workflow_id.into();
        self
    }

    /// Workflow invocation URL.
    pub fn workflow_url(&self) -> String {
        format!(
            "{}/infer/workflows/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.workspace,
            self.workflow_id
        )
    }
}

/// Client for the hosted keypoint-detection workflow.
///
/// One detection call per analysis; a failed call is reported as failed, never
/// retried automatically.
pub struct DetectorClient {
    config: DetectorConfig,
    client: Client,
}

impl DetectorClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Configured timeout, applied per request.
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Read an image file and run detection on it.
    pub async fn detect_file(&self, path: &Path) -> Result<Detection, DetectError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DetectError::ImageRead(format!("{}: {}", path.display(), e)))?;
        self.detect_base64(&STANDARD.encode(bytes)).await
    }

    /// Run detection on a base64-encoded image.
    pub async fn detect_base64(&self, image_base64: &str) -> Result<Detection, DetectError> {
        let url = self.config.workflow_url();
        let body = json!({
            "api_key": self.config.api_key,
            "inputs": {
                "image": {
                    "type": "base64",
                    "value": image_base64,
                }
            }
        });

        tracing::debug!(workflow = %url, "sending detection request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DetectError::ApiError(format!("{}: {}", status, error_text)));
        }

        let payload: Value = response.json().await?;
        let detection = parse_workflow_response(&payload)?;

        tracing::debug!(
            keypoints = detection.keypoints.len(),
            has_visualization = detection.visualization.is_some(),
            "detection complete"
        );

        Ok(detection)
    }

    /// Fetch a workflow-hosted visualization image.
    pub async fn fetch_visualization(&self, url: &str) -> Result<Vec<u8>, DetectError> {
        let response = self.client.get(url).timeout(self.timeout()).send().await?;
        if !response.status().is_success() {
            return Err(DetectError::ApiError(format!(
                "visualization fetch failed: {}",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
