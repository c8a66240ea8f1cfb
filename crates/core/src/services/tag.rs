//! Tag service.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{entities::tag, repositories::TagRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Tag service for business logic.
#[derive(Clone)]
pub struct TagService {
    tag_repo: TagRepository,
    id_gen: IdGenerator,
}

/// Input for creating a tag.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 200))]
    pub slug: String,
}

impl TagService {
    /// Create a new tag service.
    #[must_use]
    pub fn new(tag_repo: TagRepository) -> Self {
        Self {
            tag_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a tag by ID.
    pub async fn get(&self, id: &str) -> AppResult<tag::Model> {
        self.tag_repo.get_by_id(id).await
    }

    /// List all tags.
    pub async fn list(&self) -> AppResult<Vec<tag::Model>> {
        self.tag_repo.list().await
    }

    /// Create a tag (admin only, enforced at the API layer).
    pub async fn create(&self, input: CreateTagInput) -> AppResult<tag::Model> {
        input.validate()?;

        if self.tag_repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::AlreadyExists("tag slug".to_string()));
        }

        let model = tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            slug: Set(input.slug),
        };

        self.tag_repo.create(model).await
    }
}
