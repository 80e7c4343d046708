/// Route definitions and middleware setup
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{current_user, health_check, login};
use crate::AppState;

/// Build the REST router.
///
/// `/usuario-logado` is kept as an alias of `/me` for existing clients.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Authentication endpoints
        .route("/token", post(login))
        .route("/api/v1/auth/login", post(login))
        // Protected endpoints
        .route("/me", get(current_user))
        .route("/usuario-logado", get(current_user))
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
