//! Process configuration, read from the environment (and `.env`, if present).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::generation::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::generation::GeminiConfig;
use crate::render::default_font_path;
use crate::state::DEFAULT_EXPORT_CONCURRENCY;

const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY (or API_KEY) environment variable not set")]
    MissingApiKey,
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub host: String,
    pub port: u16,
    pub font_path: PathBuf,
    pub session_ttl: Duration,
    pub session_capacity: u64,
    pub export_concurrency: usize,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("GEMINI_API_KEY")
            .or_else(|| var("API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;

        let gemini = GeminiConfig::new(api_key)
            .with_model(var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()))
            .with_base_url(var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()));

        let port = parse_or("PORT", var("PORT"), 8080)?;
        let session_ttl_secs = parse_or("SESSION_TTL_SECS", var("SESSION_TTL_SECS"), 3600)?;
        let session_capacity = parse_or("SESSION_CAPACITY", var("SESSION_CAPACITY"), 10_000)?;
        let export_concurrency = parse_or(
            "EXPORT_CONCURRENCY",
            var("EXPORT_CONCURRENCY"),
            DEFAULT_EXPORT_CONCURRENCY,
        )?;
        if export_concurrency == 0 {
            return Err(ConfigError::Invalid {
                name: "EXPORT_CONCURRENCY",
                value: "0".to_string(),
            });
        }

        let allowed_origins = match var("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            gemini,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            font_path: var("LETTER_FONT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_font_path),
            session_ttl: Duration::from_secs(session_ttl_secs),
            session_capacity,
            export_concurrency,
            allowed_origins,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
