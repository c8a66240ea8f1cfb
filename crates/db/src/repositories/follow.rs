//! Follow repository.

use std::sync::Arc;

use crate::entities::{Follow, follow};
use crate::repositories::{db_err, insert_err};
use foodgram_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow by subscriber and followee.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        following_id: &str,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, user_id: &str, following_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, following_id).await?.is_some())
    }

    /// Create a new follow.
    ///
    /// A concurrent duplicate insert surfaces as `AlreadyExists` via the
    /// unique (`user_id`, `following_id`) index.
    pub async fn create(&self, model: follow::ActiveModel) -> AppResult<follow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| insert_err(e, "follow"))
    }

    /// Delete a follow by pair, returning the number of rows removed.
    pub async fn delete_by_pair(&self, user_id: &str, following_id: &str) -> AppResult<u64> {
        Follow::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(db_err)
    }

    /// Get users that a user is following (keyset paginated).
    pub async fn find_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follow::Model>> {
        let mut query = Follow::find()
            .filter(follow::Column::UserId.eq(user_id))
            .order_by_desc(follow::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follow::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowingId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(db_err)
    }
}
