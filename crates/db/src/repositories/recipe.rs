//! Recipe repository.
//!
//! The recipe row and its ingredient/tag link rows form one logical record:
//! they are written and replaced inside a single transaction so concurrent
//! readers never observe a recipe with a partial link set.

use std::sync::Arc;

use crate::entities::{
    Recipe, RecipeIngredient, RecipeTag, favorite, ingredient, measurement_unit, recipe,
    recipe_ingredient, recipe_tag, shopping_cart, tag,
};
use crate::repositories::db_err;
use foodgram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};

/// One ingredient line of a recipe, joined with name and unit abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct RecipeIngredientRow {
    pub ingredient_id: String,
    pub name: String,
    pub unit: String,
    pub amount: i32,
}

#[cfg(any(test, feature = "mock"))]
impl sea_orm::IntoMockRow for RecipeIngredientRow {
    fn into_mock_row(self) -> sea_orm::MockRow {
        use sea_orm::{IntoMockRow as _, Value};
        let mut values = std::collections::BTreeMap::new();
        values.insert("ingredient_id".to_owned(), Value::from(self.ingredient_id));
        values.insert("name".to_owned(), Value::from(self.name));
        values.insert("unit".to_owned(), Value::from(self.unit));
        values.insert("amount".to_owned(), Value::from(self.amount));
        values.into_mock_row()
    }
}

/// Filters applied to the recipe listing.
///
/// Tag slugs match any-of; the two membership filters narrow to recipes a
/// given user favorited or put in their cart.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author_id: Option<String>,
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<String>,
    pub in_cart_of: Option<String>,
}

/// Recipe repository for database operations.
#[derive(Clone)]
pub struct RecipeRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeRepository {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a recipe by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<recipe::Model>> {
        Recipe::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Find a recipe by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<recipe::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RecipeNotFound(id.to_string()))
    }

    /// Find recipes by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<recipe::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Recipe::find()
            .filter(recipe::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Create a recipe together with its ingredient and tag links.
    ///
    /// The three writes commit atomically; if any insert fails the recipe is
    /// not persisted at all.
    pub async fn create_with_links(
        &self,
        recipe: recipe::ActiveModel,
        ingredient_links: Vec<recipe_ingredient::ActiveModel>,
        tag_links: Vec<recipe_tag::ActiveModel>,
    ) -> AppResult<recipe::Model> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let created = recipe.insert(&txn).await.map_err(db_err)?;
        RecipeIngredient::insert_many(ingredient_links)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        RecipeTag::insert_many(tag_links)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(created)
    }

    /// Update a recipe, replacing its entire ingredient and tag link sets.
    ///
    /// Clear-then-reinsert, not a diff: both link sets are deleted and
    /// rewritten in the same transaction as the recipe row update.
    pub async fn update_with_links(
        &self,
        recipe: recipe::ActiveModel,
        recipe_id: &str,
        ingredient_links: Vec<recipe_ingredient::ActiveModel>,
        tag_links: Vec<recipe_tag::ActiveModel>,
    ) -> AppResult<recipe::Model> {
        let txn = self.db.begin().await.map_err(db_err)?;

        RecipeIngredient::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        RecipeTag::delete_many()
            .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let updated = recipe.update(&txn).await.map_err(db_err)?;
        RecipeIngredient::insert_many(ingredient_links)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        RecipeTag::insert_many(tag_links)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    /// Delete a recipe; link rows cascade at the schema level.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Recipe::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// List recipes (keyset paginated, newest first), narrowed by `filter`.
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<recipe::Model>> {
        let mut query = Recipe::find().order_by_desc(recipe::Column::Id);

        if let Some(author_id) = &filter.author_id {
            query = query.filter(recipe::Column::AuthorId.eq(author_id));
        }

        if !filter.tag_slugs.is_empty() {
            // A recipe with several matching tags would join to several rows
            query = query
                .join(JoinType::InnerJoin, recipe::Relation::RecipeTag.def())
                .join(JoinType::InnerJoin, recipe_tag::Relation::Tag.def())
                .filter(tag::Column::Slug.is_in(filter.tag_slugs.clone()))
                .distinct();
        }

        if let Some(user_id) = &filter.favorited_by {
            query = query
                .join(JoinType::InnerJoin, recipe::Relation::Favorite.def())
                .filter(favorite::Column::UserId.eq(user_id));
        }

        if let Some(user_id) = &filter.in_cart_of {
            query = query
                .join(JoinType::InnerJoin, recipe::Relation::ShoppingCart.def())
                .filter(shopping_cart::Column::UserId.eq(user_id));
        }

        if let Some(id) = until_id {
            query = query.filter(recipe::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// List recipes by author (newest first).
    pub async fn find_by_author(&self, author_id: &str) -> AppResult<Vec<recipe::Model>> {
        Recipe::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
            .order_by_desc(recipe::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Count recipes by author.
    pub async fn count_by_author(&self, author_id: &str) -> AppResult<u64> {
        Recipe::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
            .count(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Get the ingredient lines of a recipe in one joined query, ordered by
    /// ingredient name.
    pub async fn find_ingredient_rows(&self, recipe_id: &str) -> AppResult<Vec<RecipeIngredientRow>> {
        RecipeIngredient::find()
            .select_only()
            .column(recipe_ingredient::Column::IngredientId)
            .column_as(ingredient::Column::Name, "name")
            .column_as(measurement_unit::Column::Abbreviation, "unit")
            .column(recipe_ingredient::Column::Amount)
            .join(
                JoinType::InnerJoin,
                recipe_ingredient::Relation::Ingredient.def(),
            )
            .join(
                JoinType::InnerJoin,
                ingredient::Relation::MeasurementUnit.def(),
            )
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .order_by_asc(ingredient::Column::Name)
            .into_model::<RecipeIngredientRow>()
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Get the tags attached to a recipe.
    pub async fn find_tags(&self, recipe_id: &str) -> AppResult<Vec<tag::Model>> {
        tag::Entity::find()
            .join(JoinType::InnerJoin, tag::Relation::RecipeTag.def())
            .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }
}
