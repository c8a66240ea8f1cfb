//! Shopping cart service.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::shopping_cart,
    repositories::{RecipeRepository, ShoppingCartRepository},
};
use sea_orm::Set;

/// Shopping cart service for business logic.
#[derive(Clone)]
pub struct ShoppingCartService {
    cart_repo: ShoppingCartRepository,
    recipe_repo: RecipeRepository,
    id_gen: IdGenerator,
}

impl ShoppingCartService {
    /// Create a new shopping cart service.
    #[must_use]
    pub fn new(cart_repo: ShoppingCartRepository, recipe_repo: RecipeRepository) -> Self {
        Self {
            cart_repo,
            recipe_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a recipe to the acting user's cart.
    ///
    /// The unique pair index is the authority on duplicates: a second add,
    /// even concurrent, comes back as `AlreadyExists`.
    pub async fn add(&self, user_id: &str, recipe_id: &str) -> AppResult<shopping_cart::Model> {
        self.recipe_repo.get_by_id(recipe_id).await?;

        let model = shopping_cart::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            recipe_id: Set(recipe_id.to_string()),
            ..Default::default()
        };

        self.cart_repo.create(model).await
    }

    /// Remove a recipe from the acting user's cart.
    ///
    /// Removing an absent entry is `NotFound`, decided by the deleted row
    /// count rather than a prior read.
    pub async fn remove(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        let rows = self.cart_repo.delete_by_pair(user_id, recipe_id).await?;

        if rows == 0 {
            return Err(AppError::NotFound("shopping cart entry".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use foodgram_db::entities::recipe;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_missing_recipe() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<recipe::Model>::new()])
                .into_connection(),
        );

        let service = ShoppingCartService::new(
            ShoppingCartRepository::new(db.clone()),
            RecipeRepository::new(db),
        );
        let result = service.add("u1", "missing").await;

        assert!(matches!(result, Err(AppError::RecipeNotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_absent_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = ShoppingCartService::new(
            ShoppingCartRepository::new(db.clone()),
            RecipeRepository::new(db),
        );
        let result = service.remove("u1", "r1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
