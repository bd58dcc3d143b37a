//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;
use viperhead_core::ports::{IdentityVerifier, ImageGenerationService};
use viperhead_core::{AuthorizationGate, StyleCatalog};

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn ImageGenerationService>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub gate: Arc<AuthorizationGate>,
    /// Subject and styles used when a request does not carry its own prompt.
    pub styles: StyleCatalog,
}
