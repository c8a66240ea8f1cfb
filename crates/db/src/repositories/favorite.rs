//! Favorite repository.

use std::sync::Arc;

use crate::entities::{Favorite, favorite};
use crate::repositories::{db_err, insert_err};
use foodgram_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Favorite repository for database operations.
#[derive(Clone)]
pub struct FavoriteRepository {
    db: Arc<DatabaseConnection>,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a favorite by user and recipe.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        recipe_id: &str,
    ) -> AppResult<Option<favorite::Model>> {
        Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::RecipeId.eq(recipe_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Check if a recipe is favorited by a user.
    pub async fn is_favorited(&self, user_id: &str, recipe_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, recipe_id).await?.is_some())
    }

    /// Create a new favorite.
    ///
    /// A concurrent duplicate insert surfaces as `AlreadyExists` via the
    /// unique (`user_id`, `recipe_id`) index.
    pub async fn create(&self, model: favorite::ActiveModel) -> AppResult<favorite::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| insert_err(e, "favorite"))
    }

    /// Delete a favorite by pair, returning the number of rows removed.
    pub async fn delete_by_pair(&self, user_id: &str, recipe_id: &str) -> AppResult<u64> {
        Favorite::delete_many()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(db_err)
    }

    /// Get a user's favorites (keyset paginated, newest first).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<favorite::Model>> {
        let mut query = Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(favorite::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_favorite(id: &str, user_id: &str, recipe_id: &str) -> favorite::Model {
        favorite::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            recipe_id: recipe_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_favorited_true() {
        let fav = create_test_favorite("fav1", "user1", "recipe1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fav]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.is_favorited("user1", "recipe1").await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_is_favorited_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<favorite::Model>::new()])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.is_favorited("user1", "recipe1").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_delete_by_pair_reports_zero_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let rows = repo.delete_by_pair("user1", "recipe1").await.unwrap();

        assert_eq!(rows, 0);
    }
}
