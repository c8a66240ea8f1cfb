//! Token authentication endpoints.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use foodgram_common::AppResult;
use foodgram_core::LoginInput;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response};
use crate::response::ApiResponse;

/// Token response.
#[derive(Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

/// Exchange email and password for a token.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let auth_token = state.user_service.login(input).await?;

    Ok(ApiResponse::ok(TokenResponse { auth_token }))
}

/// Invalidate the acting user's token.
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.user_service.logout(&user.id).await?;

    Ok(response::no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token/login", post(login))
        .route("/token/logout", post(logout))
}
