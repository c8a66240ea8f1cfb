//! Follow service.
//!
//! Subscriptions are one-directional: the acting user follows an author to
//! see that author's recipes.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::{follow, user},
    repositories::{FollowRepository, RecipeRepository, UserRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// A recipe as embedded in a subscription listing.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionRecipe {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

/// A followed author together with their recipes.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub is_subscribed: bool,
    pub recipes: Vec<SubscriptionRecipe>,
    pub recipes_count: u64,
}

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    recipe_repo: RecipeRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub fn new(
        follow_repo: FollowRepository,
        user_repo: UserRepository,
        recipe_repo: RecipeRepository,
    ) -> Self {
        Self {
            follow_repo,
            user_repo,
            recipe_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow an author.
    ///
    /// Self-follow is rejected before any lookup. A duplicate follow surfaces
    /// as `AlreadyExists` from the unique pair index, so two concurrent
    /// subscribes cannot both succeed.
    pub async fn subscribe(&self, user_id: &str, target_id: &str) -> AppResult<follow::Model> {
        if user_id == target_id {
            return Err(AppError::SelfFollow);
        }

        // Ensure the target exists so a dangling ID maps to 404, not 409
        self.user_repo.get_by_id(target_id).await?;

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            following_id: Set(target_id.to_string()),
            ..Default::default()
        };

        self.follow_repo.create(model).await
    }

    /// Unfollow an author.
    ///
    /// Removing a follow that does not exist is `NotFound`; the row count
    /// from the delete is the only authority.
    pub async fn unsubscribe(&self, user_id: &str, target_id: &str) -> AppResult<()> {
        let rows = self.follow_repo.delete_by_pair(user_id, target_id).await?;

        if rows == 0 {
            return Err(AppError::NotFound("follow".to_string()));
        }

        Ok(())
    }

    /// Check whether `user_id` follows `target_id`.
    pub async fn is_subscribed(&self, user_id: &str, target_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(user_id, target_id).await
    }

    /// List the authors the acting user follows, each with their recipes.
    pub async fn subscriptions(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
        recipes_limit: usize,
    ) -> AppResult<Vec<Subscription>> {
        let follows = self
            .follow_repo
            .find_following(user_id, limit, until_id)
            .await?;

        let author_ids: Vec<String> = follows.iter().map(|f| f.following_id.clone()).collect();
        let authors = self.user_repo.find_by_ids(&author_ids).await?;

        let mut subscriptions = Vec::with_capacity(follows.len());
        for follow in &follows {
            let Some(author) = authors.iter().find(|u| u.id == follow.following_id) else {
                continue;
            };
            subscriptions.push(self.build_subscription(author, recipes_limit).await?);
        }

        Ok(subscriptions)
    }

    /// Build the subscription view of a single author.
    pub async fn build_subscription(
        &self,
        author: &user::Model,
        recipes_limit: usize,
    ) -> AppResult<Subscription> {
        let recipes_count = self.recipe_repo.count_by_author(&author.id).await?;
        let recipes = self
            .recipe_repo
            .find_by_author(&author.id)
            .await?
            .into_iter()
            .take(recipes_limit)
            .map(|r| SubscriptionRecipe {
                id: r.id,
                name: r.name,
                image: r.image,
                cooking_time: r.cooking_time,
            })
            .collect();

        Ok(Subscription {
            id: author.id.clone(),
            username: author.username.clone(),
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            avatar_url: author.avatar_url.clone(),
            is_subscribed: true,
            recipes,
            recipes_count,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn make_service(db: Arc<sea_orm::DatabaseConnection>) -> FollowService {
        FollowService::new(
            FollowRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            RecipeRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_subscribe_to_self_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = make_service(db);
        let result = service.subscribe("u1", "u1").await;

        assert!(matches!(result, Err(AppError::SelfFollow)));
    }

    #[tokio::test]
    async fn test_subscribe_missing_target() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = make_service(db);
        let result = service.subscribe("u1", "missing").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_unsubscribe_absent_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = make_service(db);
        let result = service.unsubscribe("u1", "u2").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
