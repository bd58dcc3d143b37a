pub mod context;
pub mod domain;
pub mod flight;
pub mod gate;
pub mod generation;
pub mod history;
pub mod persistence;
pub mod ports;
pub mod session;
pub mod styles;

#[cfg(test)]
mod testing;

pub use context::{AppContext, ContextHandle, Ports, ScopeError};
pub use domain::{
    Credential, GeneratedImageRecord, GenerationState, ImagePrompt, OAuthTokens,
    PermissionStatus, SessionState, SessionStatus, UserInfo,
};
pub use gate::AuthorizationGate;
pub use generation::{GenerationError, GenerationOrchestrator, VerificationChoice};
pub use history::ImageHistory;
pub use persistence::{ImageSaver, SaveError, SaveOutcome};
pub use ports::{
    AuthorizationFlow, AuthorizationOutcome, IdentityVerifier, ImageGenerationService,
    MediaLibrary, PortError, PortResult, UserInfoService,
};
pub use session::{AuthError, SessionManager, SignInOutcome};
pub use styles::StyleCatalog;
