pub mod answerer;
pub mod config;
pub mod extractor;
pub mod ollama;
pub mod prompt;
pub mod resolver;
pub mod server;

pub use answerer::{DocumentAnswerer, DocumentAnswererBuilder, MISSING_RESPONSE_PLACEHOLDER};
pub use config::AppConfig;
pub use extractor::{ExtractError, extract_text, try_extract_text};
pub use ollama::{OllamaClient, OllamaClientBuilder, OllamaClientTrait, OllamaError};
pub use prompt::{GROUNDING_FALLBACK, build_prompt};
pub use resolver::ModelResolver;
