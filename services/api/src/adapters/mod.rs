pub mod google;
pub mod http_backend;
pub mod media_library;
pub mod openai_images;
pub mod preset_flow;

pub use google::GoogleIdentityAdapter;
pub use http_backend::HttpImageBackend;
pub use media_library::FsMediaLibrary;
pub use openai_images::OpenAiImageAdapter;
pub use preset_flow::PresetAuthorizationFlow;

use tracing::warn;
use viperhead_core::ports::PortError;

/// Maps a transport-level `reqwest` failure onto the port error type.
pub(crate) fn network_error(e: reqwest::Error) -> PortError {
    PortError::Network(e.to_string())
}

/// Turns a non-success response into `PortError::Status`, keeping its body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, PortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(%status, "Failed to read error response body: {:?}", e);
            String::new()
        }
    };
    Err(PortError::Status {
        status: status.as_u16(),
        body,
    })
}
