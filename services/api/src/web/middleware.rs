//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::web::state::AppState;

/// The caller of a protected route, inserted into request extensions.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub email: String,
    pub token: String,
}

/// Middleware that validates the bearer identity token and the email allow-list.
///
/// A missing or rejected token yields 401; a valid token whose email is not
/// allow-listed yields 403.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract the bearer token
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    // 2. Verify the token with the identity provider
    let user = state.verifier.verify(&token).await.map_err(|e| {
        error!("Failed to verify bearer token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    // 3. Check the allow-list
    if !state.gate.is_allowed(&user.email) {
        warn!(email = %user.email, "rejected caller outside the allow-list");
        return Err(StatusCode::FORBIDDEN);
    }

    // 4. Hand the caller to the handler
    req.extensions_mut().insert(AuthenticatedUser {
        email: user.email,
        token,
    });
    Ok(next.run(req).await)
}
