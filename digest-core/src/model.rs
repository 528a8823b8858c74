//! Summarization model adapter.
//!
//! The pipeline treats text generation as an opaque, potentially slow,
//! potentially failing call behind the [`Summarizer`] trait. The production
//! implementation wraps an external model CLI process; tests substitute
//! their own implementations.

use crate::style::SummaryStyle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Errors surfaced by the summarization adapter
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model binary not found at '{0}'. Ensure the model CLI is installed and accessible.")]
    ModelUnavailable(String),

    #[error("Failed to spawn model process: {0}")]
    SpawnError(#[from] std::io::Error),

    #[error("Model process failed with exit code {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    #[error("Generation timed out after {0} seconds")]
    GenerationTimeout(u64),
}

/// Entry in the model catalog served by `/available-models`
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub size: String,
}

/// Opaque text-to-text summarization capability.
///
/// Implementations must not retry internally; failures are surfaced per
/// chunk and handled by the pipeline.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, chunk_text: &str, style: SummaryStyle)
        -> Result<String, ModelError>;
}

/// Client for an external summarization model CLI
#[derive(Debug, Clone)]
pub struct ModelClient {
    /// Path to the model binary
    binary_path: PathBuf,

    /// Model identifier passed to the binary
    model: String,

    /// Timeout in seconds (0 = no timeout)
    timeout_secs: u64,
}

impl ModelClient {
    pub fn new(binary_path: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            model: model.into(),
            timeout_secs: 300,
        }
    }

    /// Set the timeout in seconds
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Switch the model identifier, keeping binary and timeout
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn binary_path(&self) -> &std::path::Path {
        &self.binary_path
    }

    /// Check if the model binary is available
    pub async fn check_available(&self) -> bool {
        Command::new(&self.binary_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run one generation call against the model CLI
    async fn call(&self, prompt: &str) -> Result<String, ModelError> {
        debug!("Calling model CLI with model: {}", self.model);

        let mut cmd = Command::new(&self.binary_path);
        cmd.arg("-p").arg(prompt);
        cmd.arg("-m").arg(&self.model);

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = if self.timeout_secs > 0 {
            tokio::time::timeout(
                std::time::Duration::from_secs(self.timeout_secs),
                cmd.output(),
            )
            .await
            .map_err(|_| ModelError::GenerationTimeout(self.timeout_secs))?
        } else {
            cmd.output().await
        };

        let output = output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ModelError::ModelUnavailable(self.binary_path.display().to_string())
            } else {
                ModelError::SpawnError(e)
            }
        })?;

        debug!("Model CLI exit code: {:?}", output.status.code());

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ModelError::ProcessFailed { exit_code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl Summarizer for ModelClient {
    #[instrument(skip(self, chunk_text), fields(model = %self.model, style = %style, chunk_len = chunk_text.len()))]
    async fn summarize(
        &self,
        chunk_text: &str,
        style: SummaryStyle,
    ) -> Result<String, ModelError> {
        let prompt = format!("{}{}", style.prompt_prefix(), chunk_text);
        self.call(&prompt).await
    }
}

/// Catalog of models the service knows how to drive
pub fn available_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            id: "lamini-flan-t5-248m".to_string(),
            name: "Lamini Flan T5 Small".to_string(),
            description: "Fast and efficient summarization model".to_string(),
            size: "248M parameters".to_string(),
        },
        ModelInfo {
            id: "bart-large-cnn".to_string(),
            name: "BART CNN".to_string(),
            description: "Optimized for news summarization".to_string(),
            size: "400M parameters".to_string(),
        },
        ModelInfo {
            id: "pegasus-xsum".to_string(),
            name: "Pegasus XSum".to_string(),
            description: "Extreme summarization model".to_string(),
            size: "568M parameters".to_string(),
        },
    ]
}
