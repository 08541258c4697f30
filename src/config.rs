//! Runtime configuration.
//!
//! Read once from the environment at process start and passed by reference
//! into the components that need it. Nothing in the library reads the
//! environment after construction.

use std::env;

/// Base URL used when `OLLAMA_BASE_URL` is unset.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Model used when `OLLAMA_DEFAULT_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "llama3";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the Ollama instance, e.g. `http://localhost:11434`.
    pub ollama_base_url: String,
    /// Model queried when the caller names none and the backend listing
    /// cannot produce a better choice.
    pub default_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Builds the configuration from `OLLAMA_BASE_URL` and
    /// `OLLAMA_DEFAULT_MODEL`, falling back to the defaults for unset
    /// variables.
    pub fn from_env() -> Self {
        Self {
            ollama_base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_BASE_URL.to_string()),
            default_model: env::var("OLLAMA_DEFAULT_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }
}
