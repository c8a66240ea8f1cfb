//! Users and subscriptions endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
};
use foodgram_common::AppResult;
use foodgram_core::{CreateUserInput, SetPasswordInput, Subscription};
use foodgram_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::endpoints::{clamp_limit, default_limit};
use crate::response::ApiResponse;
use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response,
};

/// User profile response.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub is_subscribed: bool,
}

impl UserResponse {
    fn from_model(user: user::Model, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar_url: user.avatar_url,
            is_subscribed,
        }
    }
}

/// Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<impl IntoResponse> {
    let user = state.user_service.create(input).await?;

    Ok(response::created(UserResponse::from_model(user, false)))
}

/// Pagination params.
#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// List users.
async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list(clamp_limit(params.limit), params.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        users
            .into_iter()
            .map(|u| UserResponse::from_model(u, false))
            .collect(),
    ))
}

/// Get the acting user's own profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(UserResponse::from_model(user, false))
}

/// Get a user profile by ID.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&id).await?;

    let is_subscribed = match &viewer {
        Some(v) if v.id != user.id => state.follow_service.is_subscribed(&v.id, &user.id).await?,
        _ => false,
    };

    Ok(ApiResponse::ok(UserResponse::from_model(user, is_subscribed)))
}

/// Change the acting user's password.
async fn set_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetPasswordInput>,
) -> AppResult<impl IntoResponse> {
    state.user_service.set_password(&user.id, input).await?;

    Ok(response::no_content())
}

/// Avatar update request.
#[derive(Debug, Deserialize)]
pub struct SetAvatarRequest {
    pub avatar_url: String,
}

/// Set the acting user's avatar.
async fn set_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetAvatarRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .user_service
        .set_avatar(&user.id, Some(req.avatar_url))
        .await?;

    Ok(ApiResponse::ok(UserResponse::from_model(updated, false)))
}

/// Remove the acting user's avatar.
async fn delete_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.user_service.set_avatar(&user.id, None).await?;

    Ok(response::no_content())
}

/// Subscription list params.
#[derive(Debug, Deserialize)]
pub struct SubscriptionsParams {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
    /// How many recipes to embed per author.
    #[serde(default = "default_recipes_limit")]
    pub recipes_limit: usize,
}

const fn default_recipes_limit() -> usize {
    3
}

/// List the authors the acting user follows.
async fn subscriptions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SubscriptionsParams>,
) -> AppResult<ApiResponse<Vec<Subscription>>> {
    let subs = state
        .follow_service
        .subscriptions(
            &user.id,
            clamp_limit(params.limit),
            params.until_id.as_deref(),
            params.recipes_limit,
        )
        .await?;

    Ok(ApiResponse::ok(subs))
}

/// Follow an author.
async fn subscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.follow_service.subscribe(&user.id, &id).await?;

    let author = state.user_service.get(&id).await?;
    let subscription = state.follow_service.build_subscription(&author, 3).await?;

    Ok(response::created(subscription))
}

/// Unfollow an author.
async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.follow_service.unsubscribe(&user.id, &id).await?;

    Ok(response::no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register).get(list))
        .route("/me", get(me))
        .route("/me/avatar", put(set_avatar).delete(delete_avatar))
        .route("/set_password", post(set_password))
        .route("/subscriptions", get(subscriptions))
        .route("/{id}", get(show))
        .route("/{id}/subscribe", post(subscribe).delete(unsubscribe))
}
