//! services/api/src/bin/api.rs
//!
//! The companion generation service: `GET /` for liveness and a
//! bearer-protected `POST /generate-image` backed by the OpenAI images API.

use api_lib::{
    adapters::{GoogleIdentityAdapter, OpenAiImageAdapter},
    config::Config,
    error::ApiError,
    web::{router, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use viperhead_core::StyleCatalog;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    let gate = config.gate();
    if gate.is_empty() {
        warn!("ALLOWED_EMAILS is empty; every generation request will be rejected");
    }

    // --- 2. Initialize Service Adapters ---
    let mut openai_config = OpenAIConfig::new().with_api_key(config.require_openai_key()?);
    if let Some(base) = &config.openai_api_base {
        openai_config = openai_config.with_api_base(base);
    }
    let generator = Arc::new(OpenAiImageAdapter::new(
        Client::with_config(openai_config),
        config.image_model.clone(),
    ));

    let verifier = Arc::new(GoogleIdentityAdapter::new(
        reqwest::Client::new(),
        config.google_userinfo_url.clone(),
        config.google_tokeninfo_url.clone(),
        config.google_client_ids.clone(),
    ));

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        generator,
        verifier,
        gate: Arc::new(gate),
        styles: StyleCatalog::new(config.image_subject.clone()),
    });

    // --- 4. Create the Web Router ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
