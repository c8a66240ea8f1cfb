//! API integration tests.
//!
//! These tests verify routing, authentication, and response envelopes
//! against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use foodgram_api::{middleware::AppState, middleware::auth_middleware, router as api_router};
use foodgram_core::{
    FavoriteService, FollowService, IngredientService, RecipeService, ShoppingCartService,
    ShoppingListService, TagService, UserService,
};
use foodgram_db::entities::{recipe, tag};
use foodgram_db::repositories::{
    FavoriteRepository, FollowRepository, IngredientRepository, MeasurementUnitRepository,
    RecipeRepository, ShoppingCartRepository, TagRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

/// Create test app state over the given mock connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let tag_repo = TagRepository::new(Arc::clone(&db));
    let ingredient_repo = IngredientRepository::new(Arc::clone(&db));
    let unit_repo = MeasurementUnitRepository::new(Arc::clone(&db));
    let recipe_repo = RecipeRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteRepository::new(Arc::clone(&db));
    let cart_repo = ShoppingCartRepository::new(Arc::clone(&db));

    AppState {
        user_service: UserService::new(user_repo.clone()),
        follow_service: FollowService::new(
            follow_repo.clone(),
            user_repo.clone(),
            recipe_repo.clone(),
        ),
        tag_service: TagService::new(tag_repo.clone()),
        ingredient_service: IngredientService::new(ingredient_repo.clone(), unit_repo),
        recipe_service: RecipeService::new(
            recipe_repo.clone(),
            ingredient_repo,
            tag_repo,
            user_repo,
            favorite_repo.clone(),
            cart_repo.clone(),
            follow_repo,
        ),
        favorite_service: FavoriteService::new(favorite_repo, recipe_repo.clone()),
        shopping_cart_service: ShoppingCartService::new(cart_repo.clone(), recipe_repo),
        shopping_list_service: ShoppingListService::new(cart_repo),
    }
}

/// Create a test router with auth middleware wired like the server does.
fn create_test_router(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);

    api_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn empty_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tags_list_returns_ok() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tag::Model {
            id: "t1".to_string(),
            name: "Breakfast".to_string(),
            slug: "breakfast".to_string(),
        }]])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/tags/")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_recipes_list_accepts_filters_anonymously() {
    // Membership filters are ignored without a viewer; the listing still runs
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<recipe::Model>::new()])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/recipes/?tags=breakfast,dinner&is_favorited=true&limit=5000")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_recipe_requires_auth() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/recipes/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"name":"Soup","text":"Boil.","cooking_time":10,"ingredients":[],"tags":[]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_auth() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_favorite_requires_auth() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/recipes/r1/favorite")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_download_shopping_cart_requires_auth() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/recipes/download_shopping_cart")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_tag_requires_auth() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/tags/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"name":"Dinner","slug":"dinner"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_with_invalid_json_returns_error() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_register_with_short_password_rejected() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"email":"a@b.com","username":"chef","first_name":"A","last_name":"B","password":"short"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
