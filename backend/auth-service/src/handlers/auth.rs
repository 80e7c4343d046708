/// Authentication handlers
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    error::Result,
    middleware::AuthenticatedUser,
    models::{CurrentUserResponse, LoginRequest, TokenResponse},
    AppState,
};

/// Login endpoint handler
///
/// Password verification runs on the blocking pool so concurrent logins do
/// not queue behind each other on the async runtime.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let LoginRequest { username, password } = payload;

    let access_token = state.auth.authenticate_async(username, password).await?;

    Ok(Json(TokenResponse::bearer(
        access_token,
        state.auth.token_ttl().as_secs(),
    )))
}

/// Protected endpoint returning the subject of the presented token
pub async fn current_user(AuthenticatedUser(username): AuthenticatedUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        username,
        message: "Token valid and user authenticated".to_string(),
    })
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
