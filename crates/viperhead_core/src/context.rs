//! crates/viperhead_core/src/context.rs
//!
//! The application context: one explicitly constructed owner for the session,
//! the image history, the orchestrator and the saver. Its lifetime is the
//! application's lifetime; handles outlive it only as dead weak references.

use std::sync::{Arc, Weak};

use crate::gate::AuthorizationGate;
use crate::generation::GenerationOrchestrator;
use crate::history::ImageHistory;
use crate::persistence::ImageSaver;
use crate::ports::{AuthorizationFlow, ImageGenerationService, MediaLibrary, UserInfoService};
use crate::session::SessionManager;
use crate::styles::StyleCatalog;

/// Accessing state through a handle with no live context is a wiring mistake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("{0} must be used within an AppContext")]
    OutsideProvider(&'static str),
}

/// The external capabilities the context is built from.
#[derive(Clone)]
pub struct Ports {
    pub flow: Arc<dyn AuthorizationFlow>,
    pub user_info: Arc<dyn UserInfoService>,
    pub backend: Arc<dyn ImageGenerationService>,
    pub library: Arc<dyn MediaLibrary>,
}

struct ContextInner {
    session: Arc<SessionManager>,
    history: Arc<ImageHistory>,
    generator: Arc<GenerationOrchestrator>,
    saver: Arc<ImageSaver>,
}

pub struct AppContext {
    inner: Arc<ContextInner>,
}

impl AppContext {
    pub fn new(ports: Ports, gate: AuthorizationGate, styles: StyleCatalog) -> Self {
        let session = Arc::new(SessionManager::new(
            ports.flow,
            ports.user_info,
            Arc::new(gate),
        ));
        let history = Arc::new(ImageHistory::new());
        let generator = Arc::new(GenerationOrchestrator::new(
            session.clone(),
            ports.backend,
            history.clone(),
            styles,
        ));
        let saver = Arc::new(ImageSaver::new(ports.library));

        Self {
            inner: Arc::new(ContextInner {
                session,
                history,
                generator,
                saver,
            }),
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.inner.session
    }

    pub fn history(&self) -> &Arc<ImageHistory> {
        &self.inner.history
    }

    pub fn generator(&self) -> &Arc<GenerationOrchestrator> {
        &self.inner.generator
    }

    pub fn saver(&self) -> &Arc<ImageSaver> {
        &self.inner.saver
    }

    /// A handle that stays valid until this context is dropped.
    pub fn handle(&self) -> ContextHandle {
        ContextHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// A weak reference to an `AppContext`. `Default` gives an unbound handle.
#[derive(Clone, Default)]
pub struct ContextHandle {
    inner: Weak<ContextInner>,
}

impl ContextHandle {
    fn scope(&self, accessor: &'static str) -> Result<Arc<ContextInner>, ScopeError> {
        self.inner
            .upgrade()
            .ok_or(ScopeError::OutsideProvider(accessor))
    }

    pub fn session(&self) -> Result<Arc<SessionManager>, ScopeError> {
        Ok(self.scope("session")?.session.clone())
    }

    pub fn history(&self) -> Result<Arc<ImageHistory>, ScopeError> {
        Ok(self.scope("history")?.history.clone())
    }

    pub fn generator(&self) -> Result<Arc<GenerationOrchestrator>, ScopeError> {
        Ok(self.scope("generator")?.generator.clone())
    }

    pub fn saver(&self) -> Result<Arc<ImageSaver>, ScopeError> {
        Ok(self.scope("saver")?.saver.clone())
    }
}
