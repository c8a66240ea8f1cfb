//! Favorite service.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::favorite,
    repositories::{FavoriteRepository, RecipeRepository},
};
use sea_orm::Set;

/// Favorite service for business logic.
#[derive(Clone)]
pub struct FavoriteService {
    favorite_repo: FavoriteRepository,
    recipe_repo: RecipeRepository,
    id_gen: IdGenerator,
}

impl FavoriteService {
    /// Create a new favorite service.
    #[must_use]
    pub fn new(favorite_repo: FavoriteRepository, recipe_repo: RecipeRepository) -> Self {
        Self {
            favorite_repo,
            recipe_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Mark a recipe as a favorite of the acting user.
    ///
    /// The unique pair index is the authority on duplicates: a second add,
    /// even concurrent, comes back as `AlreadyExists`.
    pub async fn add(&self, user_id: &str, recipe_id: &str) -> AppResult<favorite::Model> {
        self.recipe_repo.get_by_id(recipe_id).await?;

        let model = favorite::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            recipe_id: Set(recipe_id.to_string()),
            ..Default::default()
        };

        self.favorite_repo.create(model).await
    }

    /// Remove a recipe from the acting user's favorites.
    ///
    /// Removing an absent favorite is `NotFound`, decided by the deleted
    /// row count rather than a prior read.
    pub async fn remove(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        let rows = self.favorite_repo.delete_by_pair(user_id, recipe_id).await?;

        if rows == 0 {
            return Err(AppError::NotFound("favorite".to_string()));
        }

        Ok(())
    }
}
