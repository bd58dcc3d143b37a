//! services/api/src/adapters/google.rs
//!
//! This module contains the adapter for Google's OAuth identity endpoints.
//! It implements the `UserInfoService` port (client side, user-info with the
//! access token) and the `IdentityVerifier` port (server side, token-info with
//! the identity token).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use viperhead_core::ports::{IdentityVerifier, PortError, PortResult, UserInfoService};
use viperhead_core::UserInfo;

use super::{ensure_success, network_error};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct GoogleIdentityAdapter {
    client: reqwest::Client,
    userinfo_url: String,
    tokeninfo_url: String,
    /// Client ids an identity token may be issued to. Empty accepts any audience.
    audiences: Vec<String>,
}

impl GoogleIdentityAdapter {
    pub fn new(
        client: reqwest::Client,
        userinfo_url: impl Into<String>,
        tokeninfo_url: impl Into<String>,
        audiences: Vec<String>,
    ) -> Self {
        Self {
            client,
            userinfo_url: userinfo_url.into(),
            tokeninfo_url: tokeninfo_url.into(),
            audiences,
        }
    }
}

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Deserialize)]
struct UserInfoRecord {
    email: Option<String>,
}

#[derive(Deserialize)]
struct TokenInfoRecord {
    aud: String,
    email: Option<String>,
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl UserInfoService for GoogleIdentityAdapter {
    async fn fetch_user_info(&self, access_token: &str) -> PortResult<UserInfo> {
        debug!("fetching user info");
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_error)?;

        let record: UserInfoRecord = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("Malformed user info: {}", e)))?;

        record
            .email
            .map(|email| UserInfo { email })
            .ok_or_else(|| PortError::Unexpected("User info carried no email".to_string()))
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityAdapter {
    async fn verify(&self, bearer: &str) -> PortResult<UserInfo> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", bearer)])
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "identity token rejected");
            return Err(PortError::Unauthorized);
        }

        let record: TokenInfoRecord = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("Malformed token info: {}", e)))?;

        if !self.audiences.is_empty() && !self.audiences.contains(&record.aud) {
            warn!(aud = %record.aud, "identity token issued to an unknown client");
            return Err(PortError::Unauthorized);
        }

        record
            .email
            .map(|email| UserInfo { email })
            .ok_or(PortError::Unauthorized)
    }
}
