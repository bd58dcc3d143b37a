//! crates/viperhead_core/src/generation.rs
//!
//! The generation orchestrator: checks the session credential, probes the
//! backend for liveness, requests one image and records the result.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::domain::{Credential, GeneratedImageRecord, GenerationState};
use crate::flight::SingleFlight;
use crate::history::ImageHistory;
use crate::ports::{ImageGenerationService, PortError};
use crate::session::SessionManager;
use crate::styles::StyleCatalog;

/// Why a generation attempt failed. The `Display` string is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("You must be signed in to generate images.")]
    Unauthenticated,

    /// A credential is held but no email was ever verified for it.
    #[error("Your identity has not been verified. Sign out and sign in again to continue.")]
    VerificationRequired,

    #[error("Server is not available")]
    ServerUnavailable,

    #[error("Failed to generate image: {status} - {body}")]
    GenerationFailed { status: u16, body: String },

    /// The generation request never produced an HTTP response.
    #[error("Failed to generate image: {0}")]
    RequestFailed(String),

    #[error("An image is already being generated.")]
    AlreadyGenerating,
}

/// The caller's answer to a `VerificationRequired` refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationChoice {
    SignOut,
    Dismiss,
}

/// Clears `generating` if the `generate_image` future is dropped mid-request.
struct GeneratingGuard<'a> {
    state: &'a watch::Sender<GenerationState>,
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        let cleared = self.state.send_if_modified(|s| {
            let was_generating = s.generating;
            s.generating = false;
            was_generating
        });
        if cleared {
            warn!("image generation abandoned before completion");
        }
    }
}

pub struct GenerationOrchestrator {
    session: Arc<SessionManager>,
    backend: Arc<dyn ImageGenerationService>,
    history: Arc<ImageHistory>,
    styles: StyleCatalog,
    state: watch::Sender<GenerationState>,
    flight: SingleFlight,
}

impl GenerationOrchestrator {
    pub fn new(
        session: Arc<SessionManager>,
        backend: Arc<dyn ImageGenerationService>,
        history: Arc<ImageHistory>,
        styles: StyleCatalog,
    ) -> Self {
        let (state, _) = watch::channel(GenerationState::default());
        Self {
            session,
            backend,
            history,
            styles,
            state,
            flight: SingleFlight::new(),
        }
    }

    pub fn state(&self) -> GenerationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.state.subscribe()
    }

    pub fn current_image(&self) -> Option<GeneratedImageRecord> {
        self.state.borrow().current.clone()
    }

    /// Generates one image for the signed-in user.
    ///
    /// `Ok(None)` means the backend answered without an image url; nothing is
    /// recorded in that case. Every exit path clears the `generating` flag,
    /// including dropping the future, and failures leave their message in the
    /// published state.
    pub async fn generate_image(&self) -> Result<Option<GeneratedImageRecord>, GenerationError> {
        let Some(_flight) = self.flight.try_begin() else {
            warn!("generation requested while another is in flight");
            return Err(GenerationError::AlreadyGenerating);
        };

        self.state.send_modify(|s| {
            s.generating = true;
            s.error = None;
            s.verification_pending = false;
        });
        let _generating = GeneratingGuard { state: &self.state };

        let result = self.run().await;

        self.state.send_modify(|s| {
            s.generating = false;
            match &result {
                Ok(Some(record)) => s.current = Some(record.clone()),
                Ok(None) => {}
                Err(e) => {
                    s.verification_pending = *e == GenerationError::VerificationRequired;
                    s.error = Some(e.to_string());
                }
            }
        });

        result
    }

    async fn run(&self) -> Result<Option<GeneratedImageRecord>, GenerationError> {
        let token = match self.session.credential() {
            Some(Credential::Verified { token, .. }) => token,
            Some(Credential::Opaque { .. }) => return Err(GenerationError::VerificationRequired),
            None => return Err(GenerationError::Unauthenticated),
        };

        self.backend.check_liveness().await.map_err(|e| {
            error!("Liveness check failed: {:?}", e);
            GenerationError::ServerUnavailable
        })?;

        let prompt = self.styles.prompt();
        info!(style = ?prompt.style, "requesting image generation");

        let url = self
            .backend
            .generate_image(&token, &prompt)
            .await
            .map_err(|e| {
                error!("Image generation failed: {:?}", e);
                match e {
                    PortError::Status { status, body } => {
                        GenerationError::GenerationFailed { status, body }
                    }
                    other => GenerationError::RequestFailed(other.to_string()),
                }
            })?;

        let Some(url) = url else {
            // TODO: decide with product whether a missing url should surface as a failure.
            warn!("generation response carried no image url");
            return Ok(None);
        };

        let record = self.history.add_image(url, prompt.style);
        info!(url = %record.url, "image generated");
        Ok(Some(record))
    }

    /// Answers a pending verification prompt.
    pub fn resolve_verification(&self, choice: VerificationChoice) {
        if choice == VerificationChoice::SignOut {
            self.session.sign_out();
        }
        self.state.send_modify(|s| {
            s.verification_pending = false;
            s.error = None;
        });
    }
}
