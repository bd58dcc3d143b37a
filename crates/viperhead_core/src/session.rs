//! crates/viperhead_core/src/session.rs
//!
//! The session manager: owns the authentication state and the sign-in/sign-out
//! state machine built on top of the external OAuth capability.
//!
//! States are `SignedOut`, `Authenticating`, `SignedIn` and `Error`. Every
//! sign-in attempt ends in one of the three terminal states before `sign_in`
//! returns. A dropped attempt falls back to `SignedOut`, so the loading flag
//! is never left set.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::domain::{Credential, SessionState, SessionStatus};
use crate::flight::SingleFlight;
use crate::gate::AuthorizationGate;
use crate::ports::{AuthorizationFlow, AuthorizationOutcome, UserInfoService};

//=========================================================================================
// Errors and Outcomes
//=========================================================================================

/// Why a sign-in attempt failed. The `Display` string is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The verified email is not on the allow-list.
    #[error("You are not authorized to use this application.")]
    NotAuthorized,

    /// The provider failed, or returned without the expected tokens.
    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("Failed to fetch user information.")]
    UserInfoFetchFailed,

    #[error("A sign in attempt is already in progress.")]
    SignInInProgress,
}

impl AuthError {
    fn failed(message: &str) -> Self {
        Self::AuthenticationFailed(message.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn { email: String },
    /// The user dismissed the OAuth prompt.
    Dismissed,
    /// The session was signed out or replaced while the attempt was running;
    /// its result was discarded.
    Superseded,
}

/// Resets an attempt still in `Authenticating` to `SignedOut` when dropped.
/// Covers callers that drop the `sign_in` future before it resolves.
struct AuthenticatingGuard<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl Drop for AuthenticatingGuard<'_> {
    fn drop(&mut self) {
        let reset = self.state.send_if_modified(|s| {
            if s.status != SessionStatus::Authenticating {
                return false;
            }
            *s = SessionState::default();
            true
        });
        if reset {
            warn!("sign in abandoned before completion");
        }
    }
}

//=========================================================================================
// SessionManager
//=========================================================================================

pub struct SessionManager {
    flow: Arc<dyn AuthorizationFlow>,
    user_info: Arc<dyn UserInfoService>,
    gate: Arc<AuthorizationGate>,
    state: watch::Sender<SessionState>,
    flight: SingleFlight,
}

impl SessionManager {
    pub fn new(
        flow: Arc<dyn AuthorizationFlow>,
        user_info: Arc<dyn UserInfoService>,
        gate: Arc<AuthorizationGate>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            flow,
            user_info,
            gate,
            state,
            flight: SingleFlight::new(),
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.state.borrow().credential.clone()
    }

    /// Runs the OAuth prompt, verifies the email against the allow-list and
    /// resolves once a terminal state is reached.
    ///
    /// An overlapping call is refused with `SignInInProgress` and leaves the
    /// state untouched. If `sign_out` or `sign_in_unverified` runs while the
    /// prompt is open, that later write wins and the attempt reports
    /// `Superseded`.
    pub async fn sign_in(&self) -> Result<SignInOutcome, AuthError> {
        let Some(_flight) = self.flight.try_begin() else {
            warn!("sign in requested while another attempt is in flight");
            return Err(AuthError::SignInInProgress);
        };

        if let Some(Credential::Verified { email, .. }) = self.credential() {
            return Ok(SignInOutcome::SignedIn { email });
        }

        info!("starting sign in");
        self.state.send_modify(|s| {
            s.status = SessionStatus::Authenticating;
            s.error = None;
        });
        let _authenticating = AuthenticatingGuard { state: &self.state };

        let result = self.authenticate().await;

        let applied = self.state.send_if_modified(|s| {
            if s.status != SessionStatus::Authenticating {
                return false;
            }
            match &result {
                Ok(Some(credential)) => {
                    s.status = SessionStatus::SignedIn;
                    s.credential = Some(credential.clone());
                    s.error = None;
                }
                Ok(None) => {
                    s.status = SessionStatus::SignedOut;
                    s.credential = None;
                    s.error = None;
                }
                Err(e) => {
                    s.status = SessionStatus::Error;
                    s.credential = None;
                    s.error = Some(e.to_string());
                }
            }
            true
        });

        if !applied {
            info!("session changed during sign in; discarding the result");
            return Ok(SignInOutcome::Superseded);
        }

        match result {
            Ok(Some(credential)) => {
                let email = credential.email().unwrap_or_default().to_string();
                info!(%email, "user signed in");
                Ok(SignInOutcome::SignedIn { email })
            }
            Ok(None) => {
                info!("sign in dismissed by user");
                Ok(SignInOutcome::Dismissed)
            }
            Err(e) => Err(e),
        }
    }

    /// `Ok(None)` means the prompt was dismissed.
    async fn authenticate(&self) -> Result<Option<Credential>, AuthError> {
        let outcome = self.flow.authorize().await.map_err(|e| {
            error!("Failed to start the authorization prompt: {:?}", e);
            AuthError::failed("Failed to start sign in process")
        })?;

        let tokens = match outcome {
            AuthorizationOutcome::Success(tokens) => tokens,
            AuthorizationOutcome::Dismissed => return Ok(None),
            AuthorizationOutcome::Failed(reason) => {
                error!(%reason, "authorization provider reported an error");
                return Err(AuthError::failed("Authentication failed"));
            }
        };

        let access_token = tokens.access_token.ok_or_else(|| {
            error!("No access token for user info");
            AuthError::failed("Failed to get user info token")
        })?;

        let user = self
            .user_info
            .fetch_user_info(&access_token)
            .await
            .map_err(|e| {
                error!("Failed to fetch user info: {:?}", e);
                AuthError::UserInfoFetchFailed
            })?;

        if !self.gate.is_allowed(&user.email) {
            warn!(email = %user.email, "user not on the allow-list");
            return Err(AuthError::NotAuthorized);
        }

        // The identity token, not the access token, is what the backend accepts.
        let token = tokens.id_token.ok_or_else(|| {
            error!("No ID token in authentication response");
            AuthError::failed("Failed to get ID token")
        })?;

        Ok(Some(Credential::Verified {
            email: user.email,
            token,
        }))
    }

    /// Stores a credential from an identity path that never verified an email.
    ///
    /// The session is never authenticated this way; generation will ask the
    /// caller to sign out and come back through `sign_in`.
    pub fn sign_in_unverified(&self, token: impl Into<String>) {
        let token = token.into();
        self.state.send_modify(|s| {
            s.status = SessionStatus::SignedIn;
            s.credential = Some(Credential::Opaque { token });
            s.error = None;
        });
        info!("unverified credential stored");
    }

    /// Unconditionally returns to `SignedOut`.
    pub fn sign_out(&self) {
        self.state.send_replace(SessionState::default());
        info!("user signed out");
    }
}
