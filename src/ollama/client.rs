/// Ollama HTTP client implementation.
///
/// This module provides `OllamaClient` for making synchronous HTTP requests to the Ollama API,
/// along with error types and builder patterns for configuration.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_OLLAMA_BASE_URL;

/// Client-level timeout applied to generation requests.
const GENERATE_TIMEOUT_SECS: u64 = 60;

/// Connect timeout applied to every request.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Per-request timeout for the model listing call.
const LIST_TIMEOUT_SECS: u64 = 5;

/// Errors that can occur when interacting with the Ollama API.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// The backend did not accept a connection.
    #[error("Could not connect to Ollama at {url}: {detail}")]
    Unreachable { url: String, detail: String },

    /// The request exceeded its timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Unusable response body from the Ollama API.
    #[error("Ollama API error: {message}")]
    Api { message: String },

    /// Remaining transport errors (DNS failures, protocol errors, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Builder for constructing `OllamaClient` instances.
///
/// # Examples
///
/// ```
/// use docchat::ollama::OllamaClientBuilder;
///
/// let client = OllamaClientBuilder::new()
///     .base_url("http://localhost:11434")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl OllamaClientBuilder {
    /// Creates a new `OllamaClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for the Ollama API.
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL (e.g., "http://localhost:11434")
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overrides the generation timeout (default 60 seconds).
    ///
    /// The model listing call keeps its own short per-request timeout
    /// regardless of this setting.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `OllamaClient` with the configured settings.
    ///
    /// Falls back to the default base URL when `base_url()` was not called;
    /// explicit configuration normally arrives through
    /// [`AppConfig`](crate::config::AppConfig).
    ///
    /// # Errors
    ///
    /// Returns `OllamaError::InvalidUrl` if the base URL does not parse, or
    /// `OllamaError::Network` if the underlying HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<OllamaClient, OllamaError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string());

        // Validate URL
        reqwest::Url::parse(&base_url)
            .map_err(|e| OllamaError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let timeout = self
            .timeout
            .unwrap_or_else(|| Duration::from_secs(GENERATE_TIMEOUT_SECS));

        // Create reqwest blocking client with timeout configuration
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(OllamaError::Network)?;

        Ok(OllamaClient {
            client,
            base_url,
            timeout,
        })
    }
}

/// Synchronous HTTP client for interacting with the Ollama API.
///
/// The client issues one request per call with no internal retries; a
/// failure is classified and returned immediately. It is cheap to share
/// behind an `Arc` and should be constructed using `OllamaClientBuilder`.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
}

/// Trait for Ollama API client operations.
///
/// This trait enables substituting stub clients in unit tests and provides
/// a clean interface for interacting with the Ollama API.
pub trait OllamaClientTrait: Send + Sync {
    /// Lists installed model names in the order the backend reports them.
    fn list_models(&self) -> Result<Vec<String>, OllamaError>;

    /// Generates text for `prompt` using `model`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(text))` with the generated text, or `Ok(None)` when
    /// the backend answered successfully but the reply carried no
    /// `response` field.
    fn generate(&self, model: &str, prompt: &str) -> Result<Option<String>, OllamaError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: Option<String>,
}

impl OllamaClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the `/api/tags` endpoint and returns model names.
    fn list_models_internal(&self) -> Result<Vec<String>, OllamaError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(LIST_TIMEOUT_SECS))
            .send()
            .map_err(|e| self.classify_send_error(e, LIST_TIMEOUT_SECS))?;

        if !response.status().is_success() {
            return Err(OllamaError::Http {
                status: response.status().as_u16(),
            });
        }

        let tags: TagsResponse = response
            .json()
            .map_err(|e| self.classify_read_error(e, LIST_TIMEOUT_SECS, "/api/tags"))?;

        // Backend order is preserved; entries without a name are dropped.
        Ok(tags.models.into_iter().filter_map(|m| m.name).collect())
    }

    /// Issues a single non-streaming generation request.
    fn generate_internal(&self, model: &str, prompt: &str) -> Result<Option<String>, OllamaError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| self.classify_send_error(e, self.timeout.as_secs()))?;

        if !response.status().is_success() {
            return Err(OllamaError::Http {
                status: response.status().as_u16(),
            });
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| self.classify_read_error(e, self.timeout.as_secs(), "/api/generate"))?;

        Ok(body.response)
    }

    /// Sorts a failed body read: the deadline can fire while the body is
    /// still streaming, and that is a timeout, not a malformed response.
    fn classify_read_error(
        &self,
        error: reqwest::Error,
        timeout_secs: u64,
        endpoint: &str,
    ) -> OllamaError {
        if error.is_timeout() {
            OllamaError::Timeout { timeout_secs }
        } else {
            OllamaError::Api {
                message: format!("Unusable {endpoint} response: {error}"),
            }
        }
    }

    /// Sorts a failed send into the unreachable/timeout/network buckets.
    ///
    /// Connect failures are checked first; a connect timeout counts as an
    /// unreachable backend.
    fn classify_send_error(&self, error: reqwest::Error, timeout_secs: u64) -> OllamaError {
        if error.is_connect() {
            OllamaError::Unreachable {
                url: self.base_url.clone(),
                detail: error.to_string(),
            }
        } else if error.is_timeout() {
            OllamaError::Timeout { timeout_secs }
        } else {
            OllamaError::Network(error)
        }
    }
}

impl OllamaClientTrait for OllamaClient {
    fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        self.list_models_internal()
    }

    fn generate(&self, model: &str, prompt: &str) -> Result<Option<String>, OllamaError> {
        self.generate_internal(model, prompt)
    }
}
