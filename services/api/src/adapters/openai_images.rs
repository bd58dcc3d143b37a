//! services/api/src/adapters/openai_images.rs
//!
//! This module contains the adapter for OpenAI's image generation API.
//! It implements the `ImageGenerationService` port from the `core` crate and is
//! used both by the server and by clients that call OpenAI directly.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateImageRequestArgs, Image, ImageModel, ImageSize},
    Client,
};
use async_trait::async_trait;
use tracing::debug;
use viperhead_core::ports::{ImageGenerationService, PortError, PortResult};
use viperhead_core::ImagePrompt;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `ImageGenerationService` port using the OpenAI images API.
#[derive(Clone)]
pub struct OpenAiImageAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiImageAdapter {
    /// Creates a new `OpenAiImageAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn image_model(&self) -> ImageModel {
        match self.model.as_str() {
            "dall-e-3" => ImageModel::DallE3,
            "dall-e-2" => ImageModel::DallE2,
            other => ImageModel::Other(other.to_string()),
        }
    }
}

fn port_error(e: OpenAIError) -> PortError {
    match e {
        OpenAIError::Reqwest(e) => PortError::Network(e.to_string()),
        other => PortError::Unexpected(other.to_string()),
    }
}

//=========================================================================================
// `ImageGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageGenerationService for OpenAiImageAdapter {
    /// Lists the available models; any answer means the API is reachable and the key works.
    async fn check_liveness(&self) -> PortResult<()> {
        self.client.models().list().await.map_err(port_error)?;
        Ok(())
    }

    /// The bearer credential is not forwarded; OpenAI authenticates with the API key.
    async fn generate_image(
        &self,
        _bearer: &str,
        prompt: &ImagePrompt,
    ) -> PortResult<Option<String>> {
        let request = CreateImageRequestArgs::default()
            .prompt(prompt.prompt.clone())
            .model(self.image_model())
            .n(1)
            .size(ImageSize::S1024x1024)
            .build()
            .map_err(port_error)?;

        debug!(model = %self.model, "requesting image from OpenAI");
        let response = self
            .client
            .images()
            .create(request)
            .await
            .map_err(port_error)?;

        let url = response.data.first().and_then(|image| {
            let image: &Image = image;
            match image {
                Image::Url { url, .. } => Some(url.clone()),
                _ => None,
            }
        });
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> OpenAiImageAdapter {
        let config = OpenAIConfig::new()
            .with_api_key("sk-test")
            .with_api_base(server.uri());
        OpenAiImageAdapter::new(Client::with_config(config), "dall-e-3".to_string())
    }

    #[tokio::test]
    async fn test_generate_requests_one_square_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "dall-e-3",
                "prompt": "a dog",
                "n": 1,
                "size": "1024x1024"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "created": 1700000000,
                "data": [{"url": "https://x/1.jpg", "revised_prompt": "a good dog"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = adapter(&server)
            .generate_image("ignored", &ImagePrompt::new("a dog"))
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://x/1.jpg"));
    }

    #[tokio::test]
    async fn test_empty_data_yields_no_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"created": 1700000000, "data": []})),
            )
            .mount(&server)
            .await;

        let url = adapter(&server)
            .generate_image("ignored", &ImagePrompt::new("a dog"))
            .await
            .unwrap();
        assert_eq!(url, None);
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "message": "Your request was rejected by the safety system.",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "content_policy_violation"
                }
            })))
            .mount(&server)
            .await;

        let err = adapter(&server)
            .generate_image("ignored", &ImagePrompt::new("a dog"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("safety system"));
    }

    #[tokio::test]
    async fn test_liveness_lists_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"object": "list", "data": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        assert!(adapter(&server).check_liveness().await.is_ok());
    }
}
