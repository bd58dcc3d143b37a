//! services/api/src/adapters/http_backend.rs
//!
//! This module contains the client adapter for the self-hosted generation
//! service. It implements the `ImageGenerationService` port: `GET <health>`
//! for liveness and a bearer-authenticated `POST <generate>` for images.

use async_trait::async_trait;
use tracing::debug;
use viperhead_core::ports::{ImageGenerationService, PortError, PortResult};
use viperhead_core::ImagePrompt;

use super::{ensure_success, network_error};
use crate::web::protocol::{GenerateImageRequest, GenerateImageResponse};

#[derive(Clone)]
pub struct HttpImageBackend {
    client: reqwest::Client,
    health_url: String,
    generate_url: String,
}

impl HttpImageBackend {
    pub fn new(client: reqwest::Client, base_url: &str, health_path: &str, generate_path: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            client,
            health_url: format!("{}{}", base, health_path),
            generate_url: format!("{}{}", base, generate_path),
        }
    }
}

#[async_trait]
impl ImageGenerationService for HttpImageBackend {
    async fn check_liveness(&self) -> PortResult<()> {
        debug!(url = %self.health_url, "checking backend liveness");
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(network_error)?;
        ensure_success(response).await.map(|_| ())
    }

    async fn generate_image(
        &self,
        bearer: &str,
        prompt: &ImagePrompt,
    ) -> PortResult<Option<String>> {
        let body = GenerateImageRequest {
            prompt: Some(prompt.prompt.clone()),
            style: prompt.style.clone(),
        };

        let response = self
            .client
            .post(&self.generate_url)
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let parsed: GenerateImageResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("Malformed generation response: {}", e)))?;

        Ok(parsed.image_url)
    }
}
