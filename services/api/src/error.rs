//! services/api/src/error.rs
//!
//! Defines the primary error type for the service binaries.

use crate::config::ConfigError;
use viperhead_core::{AuthError, GenerationError, SaveError};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sign in failed: {0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    Save(#[from] SaveError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_in() -> Result<(), ApiError> {
        let result: Result<(), AuthError> = Err(AuthError::NotAuthorized);
        result?;
        Ok(())
    }

    fn generate() -> Result<(), ApiError> {
        let result: Result<(), GenerationError> = Err(GenerationError::ServerUnavailable);
        result?;
        Ok(())
    }

    #[test]
    fn test_core_errors_keep_their_messages() {
        assert_eq!(
            sign_in().unwrap_err().to_string(),
            "Sign in failed: You are not authorized to use this application."
        );
        assert_eq!(generate().unwrap_err().to_string(), "Server is not available");
        assert_eq!(
            ApiError::from(SaveError::PermissionDenied).to_string(),
            "Permission denied to save photos"
        );
    }

    #[test]
    fn test_config_errors_are_prefixed() {
        let err = ApiError::from(ConfigError::MissingVar("OPENAI_API_KEY".into()));
        assert!(err.to_string().starts_with("Configuration error: "));
    }
}
