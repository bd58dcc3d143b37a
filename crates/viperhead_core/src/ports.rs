//! crates/viperhead_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the OAuth provider, the generation backend and the device.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::{ImagePrompt, OAuthTokens, PermissionStatus, UserInfo};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, disk).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// A non-success HTTP response, kept whole for diagnosis.
    #[error("{status} - {body}")]
    Status { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Identity Ports
//=========================================================================================

/// How an interactive OAuth prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Success(OAuthTokens),
    /// The user closed or cancelled the prompt.
    Dismissed,
    Failed(String),
}

#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    /// Runs the external OAuth prompt. An `Err` means the prompt could not be started.
    async fn authorize(&self) -> PortResult<AuthorizationOutcome>;
}

#[async_trait]
pub trait UserInfoService: Send + Sync {
    /// Fetches the user-info document using `access_token` as a bearer token.
    async fn fetch_user_info(&self, access_token: &str) -> PortResult<UserInfo>;
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Validates a bearer credential presented to the backend and returns its owner.
    async fn verify(&self, bearer: &str) -> PortResult<UserInfo>;
}

//=========================================================================================
// Generation Port
//=========================================================================================

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Succeeds only when the remote service reports itself live.
    async fn check_liveness(&self) -> PortResult<()>;

    /// Requests one image. `Ok(None)` means the response carried no url.
    async fn generate_image(&self, bearer: &str, prompt: &ImagePrompt)
        -> PortResult<Option<String>>;
}

//=========================================================================================
// Media Library Port
//=========================================================================================

#[async_trait]
pub trait MediaLibrary: Send + Sync {
    async fn request_permission(&self) -> PortResult<PermissionStatus>;

    /// Downloads a remote image to local storage and returns the local path.
    async fn download(&self, url: &str) -> PortResult<PathBuf>;

    /// Writes a local file into the library and returns its final location.
    async fn save_to_library(&self, local: &Path) -> PortResult<PathBuf>;
}
