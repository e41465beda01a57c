//! Account handlers.
//!
//! Provider failures come back as `200` with `error.message` set; only
//! malformed input and missing credentials produce an error status.

use axum::extract::State;
use axum::Json;
use tracing::warn;
use validator::Validate;

use tplan_models::{
    AuthResponse, LoginRequest, MeResponse, MessageResponse, RefreshTokenRequest,
    RegisterRequest, UpdatePasswordRequest,
};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    request.validate()?;

    let response = state
        .auth_service
        .register(&request.email, &request.password, &request.username)
        .await
        .unwrap_or_else(|e| {
            warn!("Registration failed: {}", e);
            AuthResponse::failure(e.to_string())
        });
    Ok(Json(response))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    request.validate()?;

    let response = state
        .auth_service
        .login(&request.email, &request.password)
        .await
        .unwrap_or_else(|e| AuthResponse::failure(e.to_string()));
    Ok(Json(response))
}

pub async fn logout(State(state): State<AppState>, user: AuthUser) -> Json<MessageResponse> {
    let response = match state.auth_service.logout(&user.access_token).await {
        Ok(()) => MessageResponse::success("Logged out successfully"),
        Err(e) => MessageResponse::failure(e.to_string()),
    };
    Json(response)
}

pub async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: user.profile(),
        error: None,
    })
}

pub async fn update_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdatePasswordRequest>,
) -> Json<MessageResponse> {
    let result = state
        .auth_service
        .update_password(&user.access_token, &request.new_password)
        .await;

    let response = match result {
        Ok(()) => MessageResponse::success("Password updated successfully"),
        Err(e) => MessageResponse::failure(e.to_string()),
    };
    Json(response)
}

/// Returns a session only; `user` stays null.
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Json<AuthResponse> {
    let response = match state.auth_service.refresh(&request.refresh_token).await {
        Ok(session) => AuthResponse::success(None, session),
        Err(e) => AuthResponse::failure(e.to_string()),
    };
    Json(response)
}
