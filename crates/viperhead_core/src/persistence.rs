//! crates/viperhead_core/src/persistence.rs
//!
//! Saving a generated image into the device media library.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::PermissionStatus;
use crate::ports::MediaLibrary;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("Permission denied to save photos")]
    PermissionDenied,

    #[error("Failed to save image")]
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// Nothing to save.
    Skipped,
}

impl SaveOutcome {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SaveOutcome::Saved(_) => Some("Image saved to photos!"),
            SaveOutcome::Skipped => None,
        }
    }
}

pub struct ImageSaver {
    library: Arc<dyn MediaLibrary>,
}

impl ImageSaver {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }

    /// Asks for permission, downloads `url` and writes it into the library.
    pub async fn save(&self, url: &str) -> Result<SaveOutcome, SaveError> {
        if url.is_empty() {
            return Ok(SaveOutcome::Skipped);
        }

        let permission = self.library.request_permission().await.map_err(|e| {
            error!("Error requesting media library permission: {:?}", e);
            SaveError::Failed
        })?;
        if permission == PermissionStatus::Denied {
            return Err(SaveError::PermissionDenied);
        }

        let local = self.library.download(url).await.map_err(|e| {
            error!("Error downloading image: {:?}", e);
            SaveError::Failed
        })?;
        let saved = self.library.save_to_library(&local).await.map_err(|e| {
            error!("Error saving image: {:?}", e);
            SaveError::Failed
        })?;

        info!(path = %saved.display(), "image saved to library");
        Ok(SaveOutcome::Saved(saved))
    }
}
