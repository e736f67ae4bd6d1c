#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use love_letter_server::generation::{GenerationError, TextGenerator};
use love_letter_server::letter::model::LetterRequest;
use love_letter_server::render::{default_font_path, LetterRenderer};
use love_letter_server::session::SessionStore;
use love_letter_server::AppState;

/// Text generator that answers from a script and records every prompt.
pub struct MockGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl MockGenerator {
    pub fn succeeding(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every reply until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.to_string());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(GenerationError::Status {
                status: 400,
                body: "API key not valid. Please pass a valid API key.".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn filled_form() -> LetterRequest {
    LetterRequest {
        recipient_name: "Jane".to_string(),
        eye_color: "blue".to_string(),
        favorite_food: "ramen".to_string(),
        favorite_place: "the park cafe".to_string(),
        special_memory: "our first rainy walk".to_string(),
        sender_name: "John".to_string(),
    }
}

pub fn test_renderer() -> LetterRenderer {
    LetterRenderer::from_file(&default_font_path()).expect("bundled font should load")
}

pub fn test_state(generator: Arc<dyn TextGenerator>) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        generator,
        test_renderer(),
        SessionStore::new(Duration::from_secs(60), 100),
    ))
}

/// A letter long enough to need several pages.
pub fn long_letter() -> String {
    let paragraph = "Every time I think of your sparkling blue eyes I remember the little cafe \
                     by the park, the smell of ramen, and the rain on our first walk together.";
    let mut letter = String::from("My Dearest Jane,\n\n");
    for _ in 0..12 {
        letter.push_str(paragraph);
        letter.push_str("\n\n");
    }
    letter.push_str("Forever yours,\nJohn");
    letter
}
