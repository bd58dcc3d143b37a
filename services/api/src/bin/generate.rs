//! services/api/src/bin/generate.rs
//!
//! A one-shot client: signs in with the configured OAuth tokens, generates a
//! single image through the configured backend and saves it to the library.

use api_lib::{
    adapters::{
        FsMediaLibrary, GoogleIdentityAdapter, HttpImageBackend, OpenAiImageAdapter,
        PresetAuthorizationFlow,
    },
    config::{Config, GenerationMode},
    error::ApiError,
};
use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use viperhead_core::ports::ImageGenerationService;
use viperhead_core::{AppContext, Ports, SignInOutcome, StyleCatalog};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- 2. Initialize Adapters ---
    let http = reqwest::Client::new();
    let identity = Arc::new(GoogleIdentityAdapter::new(
        http.clone(),
        config.google_userinfo_url.clone(),
        config.google_tokeninfo_url.clone(),
        config.google_client_ids.clone(),
    ));

    let backend: Arc<dyn ImageGenerationService> = match config.generation_mode {
        GenerationMode::Server => Arc::new(HttpImageBackend::new(
            http.clone(),
            &config.backend_url,
            &config.health_path,
            &config.generate_path,
        )),
        GenerationMode::OpenAi => {
            let mut openai_config =
                OpenAIConfig::new().with_api_key(config.require_openai_key()?);
            if let Some(base) = &config.openai_api_base {
                openai_config = openai_config.with_api_base(base);
            }
            Arc::new(OpenAiImageAdapter::new(
                Client::with_config(openai_config),
                config.image_model.clone(),
            ))
        }
    };

    let library = Arc::new(FsMediaLibrary::new(
        http,
        config.library_dir.clone(),
        std::env::temp_dir().join("viperhead"),
    ));

    // --- 3. Build the Application Context ---
    let context = AppContext::new(
        Ports {
            flow: Arc::new(PresetAuthorizationFlow::new(config.oauth_tokens())),
            user_info: identity,
            backend,
            library,
        },
        config.gate(),
        StyleCatalog::new(config.image_subject.clone()),
    );

    // --- 4. Sign In ---
    match context.session().sign_in().await {
        Ok(SignInOutcome::SignedIn { email }) => info!(%email, "signed in"),
        Ok(SignInOutcome::Dismissed | SignInOutcome::Superseded) => {
            warn!("sign in did not complete; nothing to do");
            return Ok(());
        }
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    }

    // --- 5. Generate and Save ---
    let Some(record) = context.generator().generate_image().await? else {
        warn!("the backend answered without an image url");
        return Ok(());
    };
    info!(url = %record.url, style = ?record.style, "image generated");

    let outcome = context.saver().save(&record.url).await?;
    if let Some(message) = outcome.message() {
        info!("{}", message);
    }

    Ok(())
}
