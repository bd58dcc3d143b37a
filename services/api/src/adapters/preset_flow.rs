//! services/api/src/adapters/preset_flow.rs
//!
//! An `AuthorizationFlow` that hands out tokens obtained outside the process,
//! for headless clients where the interactive OAuth prompt ran elsewhere.

use async_trait::async_trait;
use viperhead_core::ports::{AuthorizationFlow, AuthorizationOutcome, PortError, PortResult};
use viperhead_core::OAuthTokens;

#[derive(Clone, Debug)]
pub struct PresetAuthorizationFlow {
    tokens: Option<OAuthTokens>,
}

impl PresetAuthorizationFlow {
    pub fn new(tokens: Option<OAuthTokens>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl AuthorizationFlow for PresetAuthorizationFlow {
    async fn authorize(&self) -> PortResult<AuthorizationOutcome> {
        self.tokens
            .clone()
            .map(AuthorizationOutcome::Success)
            .ok_or_else(|| PortError::NotFound("no OAuth tokens configured".to_string()))
    }
}
