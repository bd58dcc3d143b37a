//! services/api/src/adapters/media_library.rs
//!
//! A filesystem-backed `MediaLibrary`: images are downloaded into a scratch
//! directory and then moved into the library directory.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;
use viperhead_core::ports::{MediaLibrary, PortError, PortResult};
use viperhead_core::PermissionStatus;

use super::{ensure_success, network_error};

#[derive(Clone)]
pub struct FsMediaLibrary {
    client: reqwest::Client,
    library_dir: PathBuf,
    scratch_dir: PathBuf,
}

impl FsMediaLibrary {
    pub fn new(client: reqwest::Client, library_dir: PathBuf, scratch_dir: PathBuf) -> Self {
        Self {
            client,
            library_dir,
            scratch_dir,
        }
    }
}

fn io_error(e: std::io::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

#[async_trait]
impl MediaLibrary for FsMediaLibrary {
    /// Granted when the library directory exists or can be created.
    async fn request_permission(&self) -> PortResult<PermissionStatus> {
        match tokio::fs::create_dir_all(&self.library_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Ok(PermissionStatus::Denied)
            }
            Err(e) => return Err(io_error(e)),
        }

        let metadata = tokio::fs::metadata(&self.library_dir)
            .await
            .map_err(io_error)?;
        if metadata.permissions().readonly() {
            return Ok(PermissionStatus::Denied);
        }
        Ok(PermissionStatus::Granted)
    }

    async fn download(&self, url: &str) -> PortResult<PathBuf> {
        let response = self.client.get(url).send().await.map_err(network_error)?;
        let bytes = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(network_error)?;

        tokio::fs::create_dir_all(&self.scratch_dir)
            .await
            .map_err(io_error)?;
        let local = self.scratch_dir.join(format!("{}.jpg", Uuid::new_v4()));
        tokio::fs::write(&local, &bytes).await.map_err(io_error)?;

        debug!(path = %local.display(), size = bytes.len(), "image downloaded");
        Ok(local)
    }

    async fn save_to_library(&self, local: &Path) -> PortResult<PathBuf> {
        let file_name = local
            .file_name()
            .ok_or_else(|| PortError::NotFound(local.display().to_string()))?;
        let destination = self.library_dir.join(file_name);

        // Copy then remove, so scratch and library may live on different devices.
        tokio::fs::copy(local, &destination)
            .await
            .map_err(io_error)?;
        tokio::fs::remove_file(local).await.map_err(io_error)?;
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    fn library(root: &TempDir) -> FsMediaLibrary {
        FsMediaLibrary::new(
            reqwest::Client::new(),
            root.path().join("library"),
            root.path().join("scratch"),
        )
    }

    #[tokio::test]
    async fn test_permission_creates_library_dir() {
        let root = TempDir::new().unwrap();
        let library = library(&root);
        assert_eq!(
            library.request_permission().await.unwrap(),
            PermissionStatus::Granted
        );
        assert!(root.path().join("library").is_dir());
    }

    #[tokio::test]
    async fn test_download_then_save() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG))
            .mount(&server)
            .await;

        let root = TempDir::new().unwrap();
        let library = library(&root);
        library.request_permission().await.unwrap();

        let local = library
            .download(&format!("{}/1.jpg", server.uri()))
            .await
            .unwrap();
        assert!(local.starts_with(root.path().join("scratch")));

        let saved = library.save_to_library(&local).await.unwrap();
        assert!(saved.starts_with(root.path().join("library")));
        assert_eq!(std::fs::read(&saved).unwrap(), JPEG);
        assert!(!local.exists());
    }

    #[tokio::test]
    async fn test_download_failure_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let root = TempDir::new().unwrap();
        let err = library(&root)
            .download(&format!("{}/gone.jpg", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Status { status: 404, .. }));
    }
}
