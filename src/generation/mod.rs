//! Letter generation - prompt templating and the text-generation backend.
//!
//! The backend client is constructed once at startup and handed to
//! [`generate_letter`] explicitly; nothing in this module holds global state.

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::build_prompt;

use async_trait::async_trait;
use thiserror::Error;

use crate::letter::model::LetterRequest;

/// The only message a user ever sees when generation fails.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate the love letter. Please check your API key and try again.";

/// Errors raised by a text-generation backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to generation backend failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("generation backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to parse generation response: {0}")]
    Parse(String),
    #[error("generation backend returned no text")]
    Empty,
}

/// Generic failure surfaced to callers of [`generate_letter`].
///
/// The backend error is logged, never carried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Failed to generate the love letter. Please check your API key and try again.")]
pub struct LetterGenerationFailed;

/// One-shot prompt-in, text-out backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Backend name, for logs.
    fn name(&self) -> &str;
}

/// Build the prompt for `request`, ask `generator` once and return its text verbatim.
pub async fn generate_letter(
    generator: &dyn TextGenerator,
    request: &LetterRequest,
) -> Result<String, LetterGenerationFailed> {
    let prompt = build_prompt(request);
    log::debug!(
        "Requesting letter to {} from {}",
        request.recipient_name,
        generator.name()
    );

    match generator.generate(&prompt).await {
        Ok(text) => {
            log::info!("Generated letter ({} chars) via {}", text.len(), generator.name());
            Ok(text)
        }
        Err(e) => {
            log::error!("Error generating content from {}: {}", generator.name(), e);
            Err(LetterGenerationFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_failure_message() {
        assert_eq!(LetterGenerationFailed.to_string(), GENERATION_FAILED_MESSAGE);
    }

    #[test]
    fn test_status_error_display() {
        let err = GenerationError::Status {
            status: 403,
            body: "API key not valid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "generation backend returned status 403: API key not valid"
        );
    }
}
