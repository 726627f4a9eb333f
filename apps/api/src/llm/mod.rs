/// Ollama client — the single point of entry for all model calls.
///
/// No other module talks to the backend directly; scoring and materials
/// generation go through the `TextGenerator` trait so tests can swap in
/// a canned implementation.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod json_extract;

const GENERATE_PATH: &str = "/api/generate";
const TAGS_PATH: &str = "/api/tags";
/// Completions can take a while on local hardware.
const GENERATE_TIMEOUT_SECS: u64 = 120;
const STATUS_TIMEOUT_SECS: u64 = 5;
const MAX_PREDICT_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model backend is not running: {0}")]
    Unavailable(String),

    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,
}

/// Anything that can turn a prompt into text at a given temperature.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Status of the model backend, surfaced through the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BackendStatus {
    pub available: bool,
    pub model: String,
    pub model_loaded: bool,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    status_client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(GENERATE_TIMEOUT_SECS))
            .build()?;
        let status_client = Client::builder()
            .timeout(std::time::Duration::from_secs(STATUS_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            status_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Checks whether the backend is reachable and the configured model is pulled.
    pub async fn status(&self) -> BackendStatus {
        let url = format!("{}{}", self.base_url, TAGS_PATH);
        let tags = match self.status_client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                resp.json::<TagsResponse>().await.unwrap_or(TagsResponse {
                    models: Vec::new(),
                })
            }
            _ => {
                return BackendStatus {
                    available: false,
                    model: self.model.clone(),
                    model_loaded: false,
                }
            }
        };

        let loaded = tags
            .models
            .iter()
            .any(|m| m.name == self.model || m.name.starts_with(&format!("{}:", self.model)));

        BackendStatus {
            available: true,
            model: self.model.clone(),
            model_loaded: loaded,
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, GENERATE_PATH);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature,
                num_predict: MAX_PREDICT_TOKENS,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_connect() {
                    LlmError::Unavailable(err.to_string())
                } else {
                    LlmError::Http(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        if parsed.response.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }

        debug!(chars = parsed.response.len(), "model call succeeded");
        Ok(parsed.response)
    }
}
