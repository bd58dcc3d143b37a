pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

pub use middleware::require_auth;
pub use rest::{generate_image_handler, health_handler};

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::web::state::AppState;

/// Builds the service router: `GET /` is public, `POST /generate-image`
/// sits behind the bearer middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/", get(health_handler));

    let protected_routes = Router::new()
        .route("/generate-image", post(generate_image_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
