//! Recipes, favorites, cart, and shopping list endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use foodgram_common::AppResult;
use foodgram_core::{CreateRecipeInput, RecipeDetail, RecipeListFilter};
use serde::Deserialize;

use crate::endpoints::{clamp_limit, default_limit};
use crate::response::ApiResponse;
use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response,
};

/// Recipe list params.
#[derive(Debug, Deserialize)]
pub struct ListRecipesParams {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
    /// Narrow to one author.
    pub author: Option<String>,
    /// Comma-separated tag slugs, any-of.
    pub tags: Option<String>,
    /// Only recipes the viewer favorited.
    #[serde(default)]
    pub is_favorited: bool,
    /// Only recipes in the viewer's shopping cart.
    #[serde(default)]
    pub is_in_shopping_cart: bool,
}

impl ListRecipesParams {
    fn into_filter(self) -> RecipeListFilter {
        let tag_slugs = self
            .tags
            .map(|tags| {
                tags.split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        RecipeListFilter {
            author_id: self.author,
            tag_slugs,
            favorited: self.is_favorited,
            in_shopping_cart: self.is_in_shopping_cart,
        }
    }
}

/// List recipes, newest first.
async fn list(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> AppResult<ApiResponse<Vec<RecipeDetail>>> {
    let limit = clamp_limit(params.limit);
    let until_id = params.until_id.clone();
    let filter = params.into_filter();

    let recipes = state
        .recipe_service
        .list(viewer.as_ref(), &filter, limit, until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(recipes))
}

/// Create a recipe authored by the acting user.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRecipeInput>,
) -> AppResult<impl IntoResponse> {
    let detail = state.recipe_service.create(&user, input).await?;

    Ok(response::created(detail))
}

/// Get a recipe by ID.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RecipeDetail>> {
    let detail = state.recipe_service.get_detail(viewer.as_ref(), &id).await?;

    Ok(ApiResponse::ok(detail))
}

/// Replace a recipe's content and links.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateRecipeInput>,
) -> AppResult<ApiResponse<RecipeDetail>> {
    let detail = state.recipe_service.update(&user, &id, input).await?;

    Ok(ApiResponse::ok(detail))
}

/// Delete a recipe.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.recipe_service.delete(&user, &id).await?;

    Ok(response::no_content())
}

/// Add a recipe to the acting user's favorites.
async fn add_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.favorite_service.add(&user.id, &id).await?;

    Ok(StatusCode::CREATED)
}

/// Remove a recipe from the acting user's favorites.
async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.favorite_service.remove(&user.id, &id).await?;

    Ok(response::no_content())
}

/// Add a recipe to the acting user's shopping cart.
async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.shopping_cart_service.add(&user.id, &id).await?;

    Ok(StatusCode::CREATED)
}

/// Remove a recipe from the acting user's shopping cart.
async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.shopping_cart_service.remove(&user.id, &id).await?;

    Ok(response::no_content())
}

/// Download the aggregated shopping list as plain text.
async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let text = state.shopping_list_service.render(&user.id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ),
        ],
        text,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/download_shopping_cart", get(download_shopping_cart))
        .route("/{id}", get(show).patch(update).delete(remove))
        .route("/{id}/favorite", post(add_favorite).delete(remove_favorite))
        .route(
            "/{id}/shopping_cart",
            post(add_to_cart).delete(remove_from_cart),
        )
}
