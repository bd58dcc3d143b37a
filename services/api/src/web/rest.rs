//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    body::Bytes,
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use viperhead_core::styles::compose;
use viperhead_core::{ImagePrompt, StyleCatalog};

use crate::web::middleware::AuthenticatedUser;
use crate::web::protocol::{GenerateImageRequest, GenerateImageResponse};
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        generate_image_handler,
    ),
    components(
        schemas(GenerateImageRequest, GenerateImageResponse)
    ),
    tags(
        (name = "Viperhead API", description = "Liveness and image generation for allow-listed users.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness check.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "The service is live", body = String)
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Generate one image for the authenticated caller.
///
/// Requires `Authorization: Bearer <identity token>`. The JSON body is optional.
#[utoipa::path(
    post,
    path = "/generate-image",
    request_body(content = GenerateImageRequest, description = "Optional prompt or style.", content_type = "application/json"),
    responses(
        (status = 200, description = "Image generated", body = GenerateImageResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Email not on the allow-list"),
        (status = 502, description = "The image provider failed")
    )
)]
pub async fn generate_image_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<Json<GenerateImageResponse>, (StatusCode, String)> {
    let request: GenerateImageRequest = if body.is_empty() {
        GenerateImageRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", e),
            )
        })?
    };

    let prompt = resolve_prompt(&state.styles, request);
    info!(email = %user.email, style = ?prompt.style, "generating image");

    match state.generator.generate_image(&user.token, &prompt).await {
        Ok(Some(url)) => Ok(Json(GenerateImageResponse {
            image_url: Some(url),
        })),
        Ok(None) => {
            warn!("image provider answered without a url");
            Err((
                StatusCode::BAD_GATEWAY,
                "Image provider returned no image url".to_string(),
            ))
        }
        Err(e) => {
            error!("Failed to generate image: {:?}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                format!("Failed to generate image: {}", e),
            ))
        }
    }
}

/// An explicit prompt wins; a bare style is composed with the configured
/// subject; otherwise the catalog picks.
fn resolve_prompt(styles: &StyleCatalog, request: GenerateImageRequest) -> ImagePrompt {
    match (request.prompt, request.style) {
        (Some(prompt), style) => ImagePrompt { prompt, style },
        (None, Some(style)) => {
            ImagePrompt::new(compose(styles.subject(), &style)).with_style(style)
        }
        (None, None) => styles.prompt(),
    }
}
