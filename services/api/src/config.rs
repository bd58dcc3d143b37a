//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;
use viperhead_core::styles::DEFAULT_SUBJECT;
use viperhead_core::{AuthorizationGate, OAuthTokens};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which image-generation backend the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationMode {
    /// The self-hosted service (`GET /`, `POST /generate-image`).
    Server,
    /// The OpenAI images API, called directly with an API key.
    OpenAi,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub generation_mode: GenerationMode,
    pub openai_api_key: Option<String>,
    pub openai_api_base: Option<String>,
    pub image_model: String,
    pub image_subject: String,
    pub allowed_emails: Vec<String>,
    pub google_client_ids: Vec<String>,
    pub google_userinfo_url: String,
    pub google_tokeninfo_url: String,
    pub backend_url: String,
    pub health_path: String,
    pub generate_path: String,
    pub library_dir: PathBuf,
    pub access_token: Option<String>,
    pub id_token: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        // --- Server Settings ---
        let bind_address_str = or_default("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = or_default("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Generation Backend ---
        let generation_mode = match or_default("GENERATION_MODE", "server")
            .to_lowercase()
            .as_str()
        {
            "server" => GenerationMode::Server,
            "openai" => GenerationMode::OpenAi,
            other => {
                return Err(ConfigError::InvalidValue(
                    "GENERATION_MODE".to_string(),
                    format!("'{}' is not one of 'server' or 'openai'", other),
                ))
            }
        };
        let openai_api_key = var("OPENAI_API_KEY");
        let openai_api_base = var("OPENAI_API_BASE");
        let image_model = or_default("IMAGE_MODEL", "dall-e-3");
        let image_subject = or_default("IMAGE_SUBJECT", DEFAULT_SUBJECT);

        let backend_url = or_default("BACKEND_URL", "http://localhost:3000");
        let health_path = or_default("HEALTH_PATH", "/");
        let generate_path = or_default("GENERATE_PATH", "/generate-image");

        // --- Identity ---
        let allowed_emails = split_list(&var("ALLOWED_EMAILS").unwrap_or_default());
        let google_client_ids = split_list(&var("GOOGLE_CLIENT_IDS").unwrap_or_default());
        let google_userinfo_url = or_default(
            "GOOGLE_USERINFO_URL",
            "https://www.googleapis.com/oauth2/v2/userinfo",
        );
        let google_tokeninfo_url = or_default(
            "GOOGLE_TOKENINFO_URL",
            "https://oauth2.googleapis.com/tokeninfo",
        );
        let access_token = var("ACCESS_TOKEN");
        let id_token = var("ID_TOKEN");

        // --- Media Library ---
        let library_dir = var("LIBRARY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./library"));

        Ok(Self {
            bind_address,
            log_level,
            generation_mode,
            openai_api_key,
            openai_api_base,
            image_model,
            image_subject,
            allowed_emails,
            google_client_ids,
            google_userinfo_url,
            google_tokeninfo_url,
            backend_url,
            health_path,
            generate_path,
            library_dir,
            access_token,
            id_token,
        })
    }

    pub fn gate(&self) -> AuthorizationGate {
        AuthorizationGate::new(self.allowed_emails.iter().cloned())
    }

    /// The OAuth tokens handed to the client, if any were configured.
    pub fn oauth_tokens(&self) -> Option<OAuthTokens> {
        if self.access_token.is_none() && self.id_token.is_none() {
            return None;
        }
        Some(OAuthTokens {
            access_token: self.access_token.clone(),
            id_token: self.id_token.clone(),
        })
    }

    /// The OpenAI key, required by everything that calls OpenAI directly.
    pub fn require_openai_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
