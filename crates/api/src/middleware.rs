//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use foodgram_core::{
    FavoriteService, FollowService, IngredientService, RecipeService, ShoppingCartService,
    ShoppingListService, TagService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub follow_service: FollowService,
    pub tag_service: TagService,
    pub ingredient_service: IngredientService,
    pub recipe_service: RecipeService,
    pub favorite_service: FavoriteService,
    pub shopping_cart_service: ShoppingCartService,
    pub shopping_list_service: ShoppingListService,
}

/// Authentication middleware.
///
/// Resolves a Bearer token to a user model and stores it in request
/// extensions; handlers pull it out via the `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
