//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged with the generation service.
//! The same types are used by the server handlers and the HTTP client adapter.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /generate-image`. Every field is optional; an empty body asks
/// the server to pick a style and use its configured subject.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct GenerateImageRequest {
    /// A complete prompt, used as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// A style label to compose with the server's subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Successful answer of `POST /generate-image`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct GenerateImageResponse {
    #[serde(default, alias = "url")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_accepts_url_alias() {
        let parsed: GenerateImageResponse =
            serde_json::from_str(r#"{"url":"https://x/1.jpg"}"#).unwrap();
        assert_eq!(parsed.image_url.as_deref(), Some("https://x/1.jpg"));

        let parsed: GenerateImageResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.image_url, None);
    }

    #[test]
    fn test_empty_request_serializes_to_empty_object() {
        let body = serde_json::to_string(&GenerateImageRequest::default()).unwrap();
        assert_eq!(body, "{}");
    }
}
