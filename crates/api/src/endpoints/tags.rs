//! Tags endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use foodgram_common::{AppError, AppResult};
use foodgram_core::CreateTagInput;
use foodgram_db::entities::tag;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Tag response.
#[derive(Serialize)]
pub struct TagResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<tag::Model> for TagResponse {
    fn from(tag: tag::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        }
    }
}

/// List all tags.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<TagResponse>>> {
    let tags = state.tag_service.list().await?;

    Ok(ApiResponse::ok(tags.into_iter().map(Into::into).collect()))
}

/// Get a tag by ID.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TagResponse>> {
    let tag = state.tag_service.get(&id).await?;

    Ok(ApiResponse::ok(tag.into()))
}

/// Create a tag. Admin only.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTagInput>,
) -> AppResult<impl IntoResponse> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("admin access required".to_string()));
    }

    let tag = state.tag_service.create(input).await?;

    Ok(response::created(TagResponse::from(tag)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show))
}
