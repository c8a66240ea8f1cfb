//! Recipe service.
//!
//! The write path validates structure first, then referenced IDs, then hands
//! the recipe row and both link sets to the repository as one transaction.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::{recipe, recipe_ingredient, recipe_tag, user},
    repositories::{
        FavoriteRepository, FollowRepository, IngredientRepository, RecipeFilter, RecipeRepository,
        ShoppingCartRepository, TagRepository, UserRepository,
    },
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

use crate::constants::{
    MAX_COOKING_TIME, MAX_INGREDIENT_AMOUNT, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT,
};

/// One ingredient line in a recipe write request.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientAmountInput {
    pub id: String,
    pub amount: i32,
}

/// Input for creating or replacing a recipe.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecipeInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    pub image: Option<String>,

    #[validate(length(min = 1))]
    pub text: String,

    pub cooking_time: i32,

    pub ingredients: Vec<IngredientAmountInput>,

    pub tags: Vec<String>,
}

/// Filters a client may apply to the recipe listing.
///
/// The membership filters are relative to the viewer; without an
/// authenticated viewer they are ignored rather than rejected.
#[derive(Debug, Clone, Default)]
pub struct RecipeListFilter {
    pub author_id: Option<String>,
    pub tag_slugs: Vec<String>,
    pub favorited: bool,
    pub in_shopping_cart: bool,
}

/// Recipe author as seen by a viewer.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub is_subscribed: bool,
}

/// One ingredient line in a recipe read shape.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeIngredientView {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Tag in a recipe read shape.
#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Full recipe read shape, personalized for the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: String,
    pub author: AuthorView,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub tags: Vec<TagView>,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

/// Recipe service for business logic.
#[derive(Clone)]
pub struct RecipeService {
    recipe_repo: RecipeRepository,
    ingredient_repo: IngredientRepository,
    tag_repo: TagRepository,
    user_repo: UserRepository,
    favorite_repo: FavoriteRepository,
    cart_repo: ShoppingCartRepository,
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

impl RecipeService {
    /// Create a new recipe service.
    #[must_use]
    pub fn new(
        recipe_repo: RecipeRepository,
        ingredient_repo: IngredientRepository,
        tag_repo: TagRepository,
        user_repo: UserRepository,
        favorite_repo: FavoriteRepository,
        cart_repo: ShoppingCartRepository,
        follow_repo: FollowRepository,
    ) -> Self {
        Self {
            recipe_repo,
            ingredient_repo,
            tag_repo,
            user_repo,
            favorite_repo,
            cart_repo,
            follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a recipe authored by `author`.
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreateRecipeInput,
    ) -> AppResult<RecipeDetail> {
        input.validate()?;
        validate_recipe_structure(&input)?;
        self.check_referenced_ids(&input).await?;

        let recipe_id = self.id_gen.generate();

        let model = recipe::ActiveModel {
            id: Set(recipe_id.clone()),
            author_id: Set(author.id.clone()),
            name: Set(input.name.clone()),
            image: Set(input.image.clone()),
            text: Set(input.text.clone()),
            cooking_time: Set(input.cooking_time),
            ..Default::default()
        };

        let (ingredient_links, tag_links) = self.build_links(&recipe_id, &input);

        let created = self
            .recipe_repo
            .create_with_links(model, ingredient_links, tag_links)
            .await?;

        tracing::info!(recipe_id = %created.id, author_id = %author.id, "Recipe created");

        self.build_detail(Some(author), &created).await
    }

    /// Replace a recipe's content and both link sets.
    ///
    /// Only the author or an admin may update. Links are cleared and
    /// reinserted rather than diffed.
    pub async fn update(
        &self,
        acting_user: &user::Model,
        recipe_id: &str,
        input: CreateRecipeInput,
    ) -> AppResult<RecipeDetail> {
        let existing = self.recipe_repo.get_by_id(recipe_id).await?;

        if existing.author_id != acting_user.id && !acting_user.is_admin() {
            return Err(AppError::Forbidden(
                "Only the author can edit this recipe".to_string(),
            ));
        }

        input.validate()?;
        validate_recipe_structure(&input)?;
        self.check_referenced_ids(&input).await?;

        let mut model: recipe::ActiveModel = existing.into();
        model.name = Set(input.name.clone());
        model.image = Set(input.image.clone());
        model.text = Set(input.text.clone());
        model.cooking_time = Set(input.cooking_time);
        model.updated_at = Set(Some(chrono::Utc::now().into()));

        let (ingredient_links, tag_links) = self.build_links(recipe_id, &input);

        let updated = self
            .recipe_repo
            .update_with_links(model, recipe_id, ingredient_links, tag_links)
            .await?;

        self.build_detail(Some(acting_user), &updated).await
    }

    /// Delete a recipe. Only the author or an admin may delete.
    pub async fn delete(&self, acting_user: &user::Model, recipe_id: &str) -> AppResult<()> {
        let existing = self.recipe_repo.get_by_id(recipe_id).await?;

        if existing.author_id != acting_user.id && !acting_user.is_admin() {
            return Err(AppError::Forbidden(
                "Only the author can delete this recipe".to_string(),
            ));
        }

        self.recipe_repo.delete(recipe_id).await?;

        tracing::info!(recipe_id = %recipe_id, "Recipe deleted");
        Ok(())
    }

    /// Get a recipe read shape, personalized for the viewer if present.
    pub async fn get_detail(
        &self,
        viewer: Option<&user::Model>,
        recipe_id: &str,
    ) -> AppResult<RecipeDetail> {
        let recipe = self.recipe_repo.get_by_id(recipe_id).await?;
        self.build_detail(viewer, &recipe).await
    }

    /// List recipes (keyset paginated, newest first), narrowed by `filter`.
    pub async fn list(
        &self,
        viewer: Option<&user::Model>,
        filter: &RecipeListFilter,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<RecipeDetail>> {
        let repo_filter = to_repo_filter(viewer, filter);
        let recipes = self.recipe_repo.list(&repo_filter, limit, until_id).await?;

        let mut details = Vec::with_capacity(recipes.len());
        for recipe in &recipes {
            details.push(self.build_detail(viewer, recipe).await?);
        }

        Ok(details)
    }

    /// Verify every referenced ingredient and tag ID exists.
    async fn check_referenced_ids(&self, input: &CreateRecipeInput) -> AppResult<()> {
        let ingredient_ids: Vec<String> =
            input.ingredients.iter().map(|i| i.id.clone()).collect();
        let found = self.ingredient_repo.find_by_ids(&ingredient_ids).await?;
        if found.len() != ingredient_ids.len() {
            let missing = ingredient_ids
                .iter()
                .find(|id| !found.iter().any(|m| &m.id == *id))
                .cloned()
                .unwrap_or_default();
            return Err(AppError::IngredientNotFound(missing));
        }

        let found_tags = self.tag_repo.find_by_ids(&input.tags).await?;
        if found_tags.len() != input.tags.len() {
            let missing = input
                .tags
                .iter()
                .find(|id| !found_tags.iter().any(|m| &m.id == *id))
                .cloned()
                .unwrap_or_default();
            return Err(AppError::TagNotFound(missing));
        }

        Ok(())
    }

    /// Build fresh link rows for a recipe write.
    fn build_links(
        &self,
        recipe_id: &str,
        input: &CreateRecipeInput,
    ) -> (
        Vec<recipe_ingredient::ActiveModel>,
        Vec<recipe_tag::ActiveModel>,
    ) {
        let ingredient_links = input
            .ingredients
            .iter()
            .map(|line| recipe_ingredient::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipe_id: Set(recipe_id.to_string()),
                ingredient_id: Set(line.id.clone()),
                amount: Set(line.amount),
            })
            .collect();

        let tag_links = input
            .tags
            .iter()
            .map(|tag_id| recipe_tag::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipe_id: Set(recipe_id.to_string()),
                tag_id: Set(tag_id.clone()),
            })
            .collect();

        (ingredient_links, tag_links)
    }

    /// Assemble the read shape of one recipe.
    async fn build_detail(
        &self,
        viewer: Option<&user::Model>,
        recipe: &recipe::Model,
    ) -> AppResult<RecipeDetail> {
        let author = self.user_repo.get_by_id(&recipe.author_id).await?;

        let is_subscribed = match viewer {
            Some(v) if v.id != author.id => {
                self.follow_repo.is_following(&v.id, &author.id).await?
            }
            _ => false,
        };

        let (is_favorited, is_in_shopping_cart) = match viewer {
            Some(v) => (
                self.favorite_repo.is_favorited(&v.id, &recipe.id).await?,
                self.cart_repo.is_in_cart(&v.id, &recipe.id).await?,
            ),
            None => (false, false),
        };

        let ingredients = self
            .recipe_repo
            .find_ingredient_rows(&recipe.id)
            .await?
            .into_iter()
            .map(|row| RecipeIngredientView {
                id: row.ingredient_id,
                name: row.name,
                measurement_unit: row.unit,
                amount: row.amount,
            })
            .collect();

        let tags = self
            .recipe_repo
            .find_tags(&recipe.id)
            .await?
            .into_iter()
            .map(|t| TagView {
                id: t.id,
                name: t.name,
                slug: t.slug,
            })
            .collect();

        Ok(RecipeDetail {
            id: recipe.id.clone(),
            author: AuthorView {
                id: author.id,
                username: author.username,
                first_name: author.first_name,
                last_name: author.last_name,
                avatar_url: author.avatar_url,
                is_subscribed,
            },
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
            created_at: recipe.created_at,
        })
    }
}

/// Resolve viewer-relative listing filters into concrete user IDs.
fn to_repo_filter(viewer: Option<&user::Model>, filter: &RecipeListFilter) -> RecipeFilter {
    let viewer_id = |wanted: bool| {
        if wanted {
            viewer.map(|v| v.id.clone())
        } else {
            None
        }
    };

    RecipeFilter {
        author_id: filter.author_id.clone(),
        tag_slugs: filter.tag_slugs.clone(),
        favorited_by: viewer_id(filter.favorited),
        in_cart_of: viewer_id(filter.in_shopping_cart),
    }
}

/// Validate the structural rules of a recipe write request.
///
/// Checks run in a fixed order so clients always see the same first error
/// for the same payload: ingredients present, no duplicate ingredients, all
/// amounts in range, tags present, no duplicate tags, cooking time in range.
fn validate_recipe_structure(input: &CreateRecipeInput) -> AppResult<()> {
    if input.ingredients.is_empty() {
        return Err(AppError::EmptyIngredients);
    }

    let mut seen = HashSet::new();
    for line in &input.ingredients {
        if !seen.insert(line.id.as_str()) {
            return Err(AppError::DuplicateIngredient(line.id.clone()));
        }
    }

    for line in &input.ingredients {
        if line.amount < MIN_INGREDIENT_AMOUNT || line.amount > MAX_INGREDIENT_AMOUNT {
            return Err(AppError::AmountOutOfRange(line.amount));
        }
    }

    if input.tags.is_empty() {
        return Err(AppError::EmptyTags);
    }

    let mut seen_tags = HashSet::new();
    for tag_id in &input.tags {
        if !seen_tags.insert(tag_id.as_str()) {
            return Err(AppError::DuplicateTag(tag_id.clone()));
        }
    }

    if input.cooking_time < MIN_COOKING_TIME || input.cooking_time > MAX_COOKING_TIME {
        return Err(AppError::CookingTimeOutOfRange(input.cooking_time));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use foodgram_db::entities::user::Role;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn make_input(
        ingredients: Vec<IngredientAmountInput>,
        tags: Vec<&str>,
        cooking_time: i32,
    ) -> CreateRecipeInput {
        CreateRecipeInput {
            name: "Borscht".to_string(),
            image: None,
            text: "Simmer for an hour.".to_string(),
            cooking_time,
            ingredients,
            tags: tags.into_iter().map(str::to_string).collect(),
        }
    }

    fn line(id: &str, amount: i32) -> IngredientAmountInput {
        IngredientAmountInput {
            id: id.to_string(),
            amount,
        }
    }

    fn create_test_user(id: &str, role: Role) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user_{id}"),
            email: format!("{id}@example.com"),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            avatar_url: None,
            role,
            password_hash: "$argon2id$stub".to_string(),
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_recipe(id: &str, author_id: &str) -> recipe::Model {
        recipe::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            name: "Borscht".to_string(),
            image: None,
            text: "Simmer for an hour.".to_string(),
            cooking_time: 60,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn make_service(db: Arc<sea_orm::DatabaseConnection>) -> RecipeService {
        RecipeService::new(
            RecipeRepository::new(db.clone()),
            IngredientRepository::new(db.clone()),
            TagRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            FavoriteRepository::new(db.clone()),
            ShoppingCartRepository::new(db.clone()),
            FollowRepository::new(db),
        )
    }

    #[test]
    fn test_empty_ingredients_rejected() {
        let input = make_input(vec![], vec!["t1"], 30);

        assert!(matches!(
            validate_recipe_structure(&input),
            Err(AppError::EmptyIngredients)
        ));
    }

    #[test]
    fn test_duplicate_ingredient_checked_before_amount() {
        // The duplicate line also has a bad amount; duplication wins
        let input = make_input(vec![line("i1", 5), line("i1", 0)], vec!["t1"], 30);

        assert!(matches!(
            validate_recipe_structure(&input),
            Err(AppError::DuplicateIngredient(id)) if id == "i1"
        ));
    }

    #[test]
    fn test_amount_out_of_range() {
        let input = make_input(vec![line("i1", 0)], vec!["t1"], 30);
        assert!(matches!(
            validate_recipe_structure(&input),
            Err(AppError::AmountOutOfRange(0))
        ));

        let input = make_input(vec![line("i1", 32_001)], vec!["t1"], 30);
        assert!(matches!(
            validate_recipe_structure(&input),
            Err(AppError::AmountOutOfRange(32_001))
        ));
    }

    #[test]
    fn test_empty_tags_rejected() {
        let input = make_input(vec![line("i1", 5)], vec![], 30);

        assert!(matches!(
            validate_recipe_structure(&input),
            Err(AppError::EmptyTags)
        ));
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let input = make_input(vec![line("i1", 5)], vec!["t1", "t1"], 30);

        assert!(matches!(
            validate_recipe_structure(&input),
            Err(AppError::DuplicateTag(id)) if id == "t1"
        ));
    }

    #[test]
    fn test_cooking_time_out_of_range() {
        let input = make_input(vec![line("i1", 5)], vec!["t1"], 0);
        assert!(matches!(
            validate_recipe_structure(&input),
            Err(AppError::CookingTimeOutOfRange(0))
        ));

        let input = make_input(vec![line("i1", 5)], vec!["t1"], 32_001);
        assert!(matches!(
            validate_recipe_structure(&input),
            Err(AppError::CookingTimeOutOfRange(32_001))
        ));
    }

    #[test]
    fn test_valid_structure_accepted() {
        let input = make_input(vec![line("i1", 5), line("i2", 100)], vec!["t1", "t2"], 45);

        assert!(validate_recipe_structure(&input).is_ok());
    }

    #[test]
    fn test_membership_filters_ignored_without_viewer() {
        let filter = RecipeListFilter {
            favorited: true,
            in_shopping_cart: true,
            ..RecipeListFilter::default()
        };

        let repo_filter = to_repo_filter(None, &filter);

        assert!(repo_filter.favorited_by.is_none());
        assert!(repo_filter.in_cart_of.is_none());
    }

    #[test]
    fn test_membership_filters_resolve_to_viewer() {
        let viewer = create_test_user("u1", Role::User);
        let filter = RecipeListFilter {
            author_id: Some("a1".to_string()),
            tag_slugs: vec!["breakfast".to_string()],
            favorited: true,
            in_shopping_cart: false,
        };

        let repo_filter = to_repo_filter(Some(&viewer), &filter);

        assert_eq!(repo_filter.author_id.as_deref(), Some("a1"));
        assert_eq!(repo_filter.tag_slugs, vec!["breakfast".to_string()]);
        assert_eq!(repo_filter.favorited_by.as_deref(), Some("u1"));
        assert!(repo_filter.in_cart_of.is_none());
    }

    #[tokio::test]
    async fn test_update_by_stranger_forbidden() {
        let existing = create_test_recipe("r1", "owner");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = make_service(db);
        let stranger = create_test_user("stranger", Role::User);
        let input = make_input(vec![line("i1", 5)], vec!["t1"], 30);

        let result = service.update(&stranger, "r1", input).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_by_admin_allowed() {
        let existing = create_test_recipe("r1", "owner");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = make_service(db);
        let admin = create_test_user("admin", Role::Admin);

        assert!(service.delete(&admin, "r1").await.is_ok());
    }
}
