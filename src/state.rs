//! Shared application state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::config::AppConfig;
use crate::generation::{GeminiClient, TextGenerator};
use crate::render::{LetterRenderer, RenderError};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub renderer: Arc<LetterRenderer>,
    pub sessions: SessionStore,
    /// Bounds how many captures are held in memory at once.
    pub export_permits: Arc<Semaphore>,
}

/// Concurrent exports when none is configured.
pub const DEFAULT_EXPORT_CONCURRENCY: usize = 2;

impl AppState {
    /// Build the production state: Gemini client, bundled or configured font.
    pub fn from_config(config: &AppConfig) -> Result<Self, RenderError> {
        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .user_agent(concat!("love-letter-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        let generator = GeminiClient::new(config.gemini.clone(), http_client);
        log::info!("Using Gemini model {}", generator.model());

        let renderer = LetterRenderer::from_file(&config.font_path)?;
        log::info!("Loaded letter font from {}", config.font_path.display());

        Ok(Self::new(
            Arc::new(generator),
            renderer,
            SessionStore::new(config.session_ttl, config.session_capacity),
        )
        .with_export_concurrency(config.export_concurrency))
    }

    pub fn new(
        generator: Arc<dyn TextGenerator>,
        renderer: LetterRenderer,
        sessions: SessionStore,
    ) -> Self {
        Self {
            generator,
            renderer: Arc::new(renderer),
            sessions,
            export_permits: Arc::new(Semaphore::new(DEFAULT_EXPORT_CONCURRENCY)),
        }
    }

    pub fn with_export_concurrency(mut self, permits: usize) -> Self {
        self.export_permits = Arc::new(Semaphore::new(permits.max(1)));
        self
    }
}
