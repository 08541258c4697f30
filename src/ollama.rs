/// Ollama HTTP client module.
///
/// This module provides a blocking HTTP client for interacting with the Ollama API,
/// including error classification and timeout configuration.
mod client;

pub use client::{OllamaClient, OllamaClientBuilder, OllamaClientTrait, OllamaError};
