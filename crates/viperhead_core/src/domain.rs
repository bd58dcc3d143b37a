//! crates/viperhead_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Utc};

//=========================================================================================
// Identity
//=========================================================================================

/// A bearer credential held by the session.
///
/// `Verified` credentials passed the email allow-list. `Opaque` credentials came
/// from an alternate sign-in path that never verified an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Verified { email: String, token: String },
    Opaque { token: String },
}

impl Credential {
    pub fn token(&self) -> &str {
        match self {
            Credential::Verified { token, .. } | Credential::Opaque { token } => token,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Credential::Verified { email, .. } => Some(email),
            Credential::Opaque { .. } => None,
        }
    }
}

/// Tokens returned by a successful OAuth round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthTokens {
    /// Used only to fetch the user-info document.
    pub access_token: Option<String>,
    /// Kept as the bearer credential for backend calls.
    pub id_token: Option<String>,
}

/// The subset of the user-info document the application cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub email: String,
}

//=========================================================================================
// Session
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    SignedOut,
    Authenticating,
    SignedIn,
    Error,
}

/// A snapshot of the authentication state owned by the `SessionManager`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub credential: Option<Credential>,
    /// Last human-readable failure reason.
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::SignedOut,
            credential: None,
            error: None,
        }
    }
}

impl SessionState {
    /// True only when an allow-listed email backs the credential.
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::SignedIn
            && matches!(self.credential, Some(Credential::Verified { .. }))
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Authenticating
    }

    pub fn user_email(&self) -> Option<&str> {
        self.credential.as_ref().and_then(Credential::email)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.credential.as_ref().map(Credential::token)
    }
}

//=========================================================================================
// Images
//=========================================================================================

/// A single generated image. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImageRecord {
    pub url: String,
    /// Style label applied to the prompt, when style randomization is on.
    pub style: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// What gets sent to a generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePrompt {
    pub prompt: String,
    pub style: Option<String>,
}

impl ImagePrompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Observable state of the generation orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationState {
    pub generating: bool,
    /// The most recently generated image.
    pub current: Option<GeneratedImageRecord>,
    pub error: Option<String>,
    /// Set when the caller holds an unverified credential and must choose to
    /// sign out or dismiss.
    pub verification_pending: bool,
}

/// Device permission answer for the media library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}
