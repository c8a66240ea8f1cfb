//! Shopping cart repository.

use std::sync::Arc;

use crate::entities::{
    ShoppingCart, ingredient, measurement_unit, recipe, recipe_ingredient, shopping_cart,
};
use crate::repositories::{db_err, insert_err};
use foodgram_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

/// One ingredient line from a recipe in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CartIngredientRow {
    /// Ingredient display name.
    pub name: String,
    /// Measurement unit abbreviation.
    pub unit: String,
    /// Amount used by one recipe.
    pub amount: i32,
}

#[cfg(any(test, feature = "mock"))]
impl sea_orm::IntoMockRow for CartIngredientRow {
    fn into_mock_row(self) -> sea_orm::MockRow {
        use sea_orm::{IntoMockRow as _, Value};
        let mut values = std::collections::BTreeMap::new();
        values.insert("name".to_owned(), Value::from(self.name));
        values.insert("unit".to_owned(), Value::from(self.unit));
        values.insert("amount".to_owned(), Value::from(self.amount));
        values.into_mock_row()
    }
}

/// Shopping cart repository for database operations.
#[derive(Clone)]
pub struct ShoppingCartRepository {
    db: Arc<DatabaseConnection>,
}

impl ShoppingCartRepository {
    /// Create a new shopping cart repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a cart entry by user and recipe.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        recipe_id: &str,
    ) -> AppResult<Option<shopping_cart::Model>> {
        ShoppingCart::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Check if a recipe is in a user's cart.
    pub async fn is_in_cart(&self, user_id: &str, recipe_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, recipe_id).await?.is_some())
    }

    /// Create a new cart entry.
    ///
    /// A concurrent duplicate insert surfaces as `AlreadyExists` via the
    /// unique (`user_id`, `recipe_id`) index.
    pub async fn create(&self, model: shopping_cart::ActiveModel) -> AppResult<shopping_cart::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| insert_err(e, "shopping cart entry"))
    }

    /// Delete a cart entry by pair, returning the number of rows removed.
    pub async fn delete_by_pair(&self, user_id: &str, recipe_id: &str) -> AppResult<u64> {
        ShoppingCart::delete_many()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(db_err)
    }

    /// Get a user's cart entries (keyset paginated, newest first).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<shopping_cart::Model>> {
        let mut query = ShoppingCart::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .order_by_desc(shopping_cart::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(shopping_cart::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Fetch every ingredient line across a user's cart in ONE query:
    /// cart -> recipe -> recipe_ingredient -> ingredient -> measurement_unit.
    ///
    /// Grouping happens in memory afterwards; a per-recipe query loop here
    /// would cost O(recipes) round trips.
    pub async fn find_cart_ingredient_rows(&self, user_id: &str) -> AppResult<Vec<CartIngredientRow>> {
        recipe_ingredient::Entity::find()
            .select_only()
            .column_as(ingredient::Column::Name, "name")
            .column_as(measurement_unit::Column::Abbreviation, "unit")
            .column(recipe_ingredient::Column::Amount)
            .join(JoinType::InnerJoin, recipe_ingredient::Relation::Recipe.def())
            .join(JoinType::InnerJoin, recipe::Relation::ShoppingCart.def())
            .join(
                JoinType::InnerJoin,
                recipe_ingredient::Relation::Ingredient.def(),
            )
            .join(
                JoinType::InnerJoin,
                ingredient::Relation::MeasurementUnit.def(),
            )
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .into_model::<CartIngredientRow>()
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

    fn create_test_entry(id: &str, user_id: &str, recipe_id: &str) -> shopping_cart::Model {
        shopping_cart::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            recipe_id: recipe_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_in_cart_true() {
        let entry = create_test_entry("sc1", "user1", "recipe1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry]])
                .into_connection(),
        );

        let repo = ShoppingCartRepository::new(db);
        let result = repo.is_in_cart("user1", "recipe1").await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_delete_by_pair_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ShoppingCartRepository::new(db);
        let rows = repo.delete_by_pair("user1", "recipe1").await.unwrap();

        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_find_cart_ingredient_rows_single_query() {
        let rows = vec![
            CartIngredientRow {
                name: "Salt".to_string(),
                unit: "g".to_string(),
                amount: 5,
            },
            CartIngredientRow {
                name: "Salt".to_string(),
                unit: "g".to_string(),
                amount: 3,
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let repo = ShoppingCartRepository::new(db);
        let result = repo.find_cart_ingredient_rows("user1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].amount, 5);
    }
}
