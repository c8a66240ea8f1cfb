//! Ingredients endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use foodgram_common::{AppError, AppResult};
use foodgram_core::{CreateIngredientInput, CreateMeasurementUnitInput};
use foodgram_db::{entities::measurement_unit, repositories::IngredientWithUnit};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::clamp_limit,
    extractors::AuthUser,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Ingredient response with unit abbreviation.
#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
}

impl From<IngredientWithUnit> for IngredientResponse {
    fn from(row: IngredientWithUnit) -> Self {
        Self {
            id: row.id,
            name: row.name,
            measurement_unit: row.unit,
        }
    }
}

/// Ingredient search params.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Case-insensitive name substring filter.
    pub name: Option<String>,
    #[serde(default = "default_search_limit")]
    pub limit: u64,
}

const fn default_search_limit() -> u64 {
    50
}

/// List ingredients, optionally filtered by a name fragment.
async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<ApiResponse<Vec<IngredientResponse>>> {
    let rows = state
        .ingredient_service
        .list(params.name.as_deref(), clamp_limit(params.limit))
        .await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Get an ingredient by ID.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<IngredientResponse>> {
    let row = state.ingredient_service.get_with_unit(&id).await?;

    Ok(ApiResponse::ok(row.into()))
}

/// Create an ingredient. Admin only.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateIngredientInput>,
) -> AppResult<impl IntoResponse> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("admin access required".to_string()));
    }

    let created = state.ingredient_service.create(input).await?;
    let row = state.ingredient_service.get_with_unit(&created.id).await?;

    Ok(response::created(IngredientResponse::from(row)))
}

/// Update an ingredient. Admin only.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateIngredientInput>,
) -> AppResult<ApiResponse<IngredientResponse>> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("admin access required".to_string()));
    }

    state.ingredient_service.update(&id, input).await?;
    let row = state.ingredient_service.get_with_unit(&id).await?;

    Ok(ApiResponse::ok(row.into()))
}

/// List measurement units.
async fn list_units(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<measurement_unit::Model>>> {
    let units = state.ingredient_service.list_units().await?;

    Ok(ApiResponse::ok(units))
}

/// Create a measurement unit. Admin only.
async fn create_unit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMeasurementUnitInput>,
) -> AppResult<impl IntoResponse> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("admin access required".to_string()));
    }

    let unit = state.ingredient_service.create_unit(input).await?;

    Ok(response::created(unit))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/units", get(list_units).post(create_unit))
        .route("/{id}", get(show).patch(update))
}
