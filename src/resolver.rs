/// Model selection against the locally installed Ollama models.
use std::sync::Arc;

use crate::config::AppConfig;
use crate::ollama::OllamaClientTrait;

/// Picks the model used for generation when the caller did not name one.
///
/// The resolver prefers the configured default model and substitutes the
/// first installed model when the default is missing. It never fails:
/// when the backend cannot be queried the configured default is returned
/// and the generation call surfaces the real error.
pub struct ModelResolver {
    client: Arc<dyn OllamaClientTrait>,
    default_model: String,
}

impl ModelResolver {
    /// Creates a resolver over `client` using the default model from `config`.
    pub fn new(client: Arc<dyn OllamaClientTrait>, config: &AppConfig) -> Self {
        Self {
            client,
            default_model: config.default_model.clone(),
        }
    }

    /// Selects the model to generate with.
    ///
    /// # Returns
    ///
    /// The configured default when it is installed or when the listing is
    /// unavailable, otherwise the first installed model.
    pub fn select_model(&self) -> String {
        let models = match self.client.list_models() {
            Ok(models) => models,
            Err(e) => {
                tracing::error!(
                    "failed to fetch available models: {e}; using default '{}'",
                    self.default_model
                );
                return self.default_model.clone();
            }
        };

        if models.is_empty() {
            tracing::warn!(
                "no models returned from Ollama; using default '{}'",
                self.default_model
            );
            return self.default_model.clone();
        }

        if models.iter().any(|name| name == &self.default_model) {
            return self.default_model.clone();
        }

        // First entry in backend-reported order; no re-sorting.
        let substitute = models[0].clone();
        tracing::warn!(
            "default model '{}' not found; using '{substitute}' instead",
            self.default_model
        );
        substitute
    }
}
