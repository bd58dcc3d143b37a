//! In-memory port fakes shared by the core's unit tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::domain::{ImagePrompt, OAuthTokens, PermissionStatus, UserInfo};
use crate::ports::{
    AuthorizationFlow, AuthorizationOutcome, ImageGenerationService, MediaLibrary, PortError,
    PortResult, UserInfoService,
};

pub fn tokens(access: &str, id: &str) -> OAuthTokens {
    OAuthTokens {
        access_token: Some(access.to_string()),
        id_token: Some(id.to_string()),
    }
}

//=========================================================================================
// Identity
//=========================================================================================

pub struct FakeFlow {
    outcome: PortResult<AuthorizationOutcome>,
    pub gate: Option<Arc<Notify>>,
    pub calls: AtomicUsize,
}

impl FakeFlow {
    pub fn new(outcome: PortResult<AuthorizationOutcome>) -> Self {
        Self {
            outcome,
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn success(access: &str, id: &str) -> Self {
        Self::new(Ok(AuthorizationOutcome::Success(tokens(access, id))))
    }

    /// Holds every `authorize` call until the notify fires.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl AuthorizationFlow for FakeFlow {
    async fn authorize(&self) -> PortResult<AuthorizationOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.outcome {
            Ok(outcome) => Ok(outcome.clone()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

pub struct FakeUserInfo {
    email: Option<String>,
    pub seen_tokens: Mutex<Vec<String>>,
}

impl FakeUserInfo {
    pub fn returning(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            email: None,
            seen_tokens: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UserInfoService for FakeUserInfo {
    async fn fetch_user_info(&self, access_token: &str) -> PortResult<UserInfo> {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(access_token.to_string());
        self.email
            .clone()
            .map(|email| UserInfo { email })
            .ok_or_else(|| PortError::Network("connection reset".to_string()))
    }
}

//=========================================================================================
// Generation
//=========================================================================================

pub struct FakeBackend {
    live: bool,
    response: PortResult<Option<String>>,
    pub gate: Option<Arc<Notify>>,
    pub liveness_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub seen: Mutex<Vec<(String, ImagePrompt)>>,
}

impl FakeBackend {
    pub fn new(live: bool, response: PortResult<Option<String>>) -> Self {
        Self {
            live,
            response,
            gate: None,
            liveness_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(url: &str) -> Self {
        Self::new(true, Ok(Some(url.to_string())))
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn network_calls(&self) -> usize {
        self.liveness_calls.load(Ordering::SeqCst) + self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerationService for FakeBackend {
    async fn check_liveness(&self) -> PortResult<()> {
        self.liveness_calls.fetch_add(1, Ordering::SeqCst);
        if self.live {
            Ok(())
        } else {
            Err(PortError::Status {
                status: 500,
                body: "Internal Server Error".to_string(),
            })
        }
    }

    async fn generate_image(
        &self,
        bearer: &str,
        prompt: &ImagePrompt,
    ) -> PortResult<Option<String>> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((bearer.to_string(), prompt.clone()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.response {
            Ok(url) => Ok(url.clone()),
            Err(PortError::Status { status, body }) => Err(PortError::Status {
                status: *status,
                body: body.clone(),
            }),
            Err(e) => Err(PortError::Network(e.to_string())),
        }
    }
}

//=========================================================================================
// Media Library
//=========================================================================================

pub struct FakeLibrary {
    pub permission: PermissionStatus,
    pub fail_download: bool,
    pub saved: Mutex<Vec<PathBuf>>,
}

impl FakeLibrary {
    pub fn granted() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            fail_download: false,
            saved: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MediaLibrary for FakeLibrary {
    async fn request_permission(&self) -> PortResult<PermissionStatus> {
        Ok(self.permission)
    }

    async fn download(&self, url: &str) -> PortResult<PathBuf> {
        if self.fail_download {
            return Err(PortError::Status {
                status: 404,
                body: url.to_string(),
            });
        }
        Ok(PathBuf::from("/tmp/temp_image.jpg"))
    }

    async fn save_to_library(&self, local: &Path) -> PortResult<PathBuf> {
        let saved = PathBuf::from("/library").join(local.file_name().unwrap_or_default());
        self.saved.lock().unwrap().push(saved.clone());
        Ok(saved)
    }
}
