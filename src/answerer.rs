//! Document question answering over the local LLM.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::ollama::{OllamaClientTrait, OllamaError};
use crate::prompt::build_prompt;
use crate::resolver::ModelResolver;

/// Reply shown when generation succeeded but carried no response text.
pub const MISSING_RESPONSE_PLACEHOLDER: &str = "No response text found.";

/// Builder for constructing `DocumentAnswerer` instances.
#[derive(Default)]
pub struct DocumentAnswererBuilder {
    client: Option<Arc<dyn OllamaClientTrait>>,
    config: Option<AppConfig>,
}

impl DocumentAnswererBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Ollama client to use.
    pub fn client(mut self, client: Arc<dyn OllamaClientTrait>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the configuration (defaults apply when omitted).
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the `DocumentAnswerer`.
    ///
    /// # Panics
    ///
    /// Panics if `client()` was not called.
    #[must_use]
    pub fn build(self) -> DocumentAnswerer {
        let client = self.client.expect("client must be set via client() method");
        let config = self.config.unwrap_or_default();
        DocumentAnswerer::new(client, &config)
    }
}

/// Answers questions about an uploaded document using the local LLM.
///
/// Every call goes through the grounding prompt, so replies are restricted
/// to the supplied document text. Failures never escape as errors: they are
/// folded into the fixed user-facing messages shown in the chat window.
pub struct DocumentAnswerer {
    client: Arc<dyn OllamaClientTrait>,
    resolver: ModelResolver,
}

impl DocumentAnswerer {
    /// Creates a new `DocumentAnswerer` with the specified client.
    #[must_use]
    pub fn new(client: Arc<dyn OllamaClientTrait>, config: &AppConfig) -> Self {
        let resolver = ModelResolver::new(Arc::clone(&client), config);
        Self { client, resolver }
    }

    /// Answers `question` using only `document_text` as context.
    ///
    /// # Arguments
    ///
    /// * `document_text` - Extracted document text to ground the answer in
    /// * `question` - The user's question
    /// * `model` - Explicit model override; blank or absent defers to the
    ///   resolver
    ///
    /// # Returns
    ///
    /// A displayable string in every case: the LLM reply, the missing-text
    /// placeholder, or a fixed error message.
    pub fn answer(&self, document_text: &str, question: &str, model: Option<&str>) -> String {
        let model = match model {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self.resolver.select_model(),
        };

        let prompt = build_prompt(document_text, question);
        tracing::info!(model = %model, prompt_chars = prompt.len(), "querying local LLM");

        match self.client.generate(&model, &prompt) {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!("LLM reply carried no response text");
                MISSING_RESPONSE_PLACEHOLDER.to_string()
            }
            Err(e) => {
                tracing::error!("LLM query failed: {e}");
                failure_message(&e)
            }
        }
    }
}

/// Maps a transport failure onto the message shown in the chat window.
fn failure_message(error: &OllamaError) -> String {
    match error {
        OllamaError::Unreachable { url, .. } => format!(
            "Error: Could not connect to local Ollama instance at {url}. Please ensure Ollama is running."
        ),
        OllamaError::Timeout { .. } => {
            "Error: The request to the local LLM timed out.".to_string()
        }
        other => format!("Error querying LLM: {other}"),
    }
}
