//! Error types for foodgram-rs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Not Found ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    // === Auth ===
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // === Recipe validation ===
    #[error("Recipe must contain at least one ingredient")]
    EmptyIngredients,

    #[error("Duplicate ingredient in recipe: {0}")]
    DuplicateIngredient(String),

    #[error("Ingredient amount out of range: {0}")]
    AmountOutOfRange(i32),

    #[error("Recipe must have at least one tag")]
    EmptyTags,

    #[error("Duplicate tag in recipe: {0}")]
    DuplicateTag(String),

    #[error("Cooking time out of range: {0}")]
    CookingTimeOutOfRange(i32),

    // === State conflicts ===
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Cannot follow yourself")]
    SelfFollow,

    // === Other client errors ===
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_)
            | Self::UserNotFound(_)
            | Self::RecipeNotFound(_)
            | Self::IngredientNotFound(_)
            | Self::TagNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::EmptyIngredients
            | Self::DuplicateIngredient(_)
            | Self::AmountOutOfRange(_)
            | Self::EmptyTags
            | Self::DuplicateTag(_)
            | Self::CookingTimeOutOfRange(_)
            | Self::SelfFollow
            | Self::BadRequest(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::RecipeNotFound(_) => "RECIPE_NOT_FOUND",
            Self::IngredientNotFound(_) => "INGREDIENT_NOT_FOUND",
            Self::TagNotFound(_) => "TAG_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::EmptyIngredients => "EMPTY_INGREDIENTS",
            Self::DuplicateIngredient(_) => "DUPLICATE_INGREDIENT",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::EmptyTags => "EMPTY_TAGS",
            Self::DuplicateTag(_) => "DUPLICATE_TAG",
            Self::CookingTimeOutOfRange(_) => "COOKING_TIME_OUT_OF_RANGE",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_request() {
        for err in [
            AppError::EmptyIngredients,
            AppError::DuplicateIngredient("salt".to_string()),
            AppError::AmountOutOfRange(0),
            AppError::EmptyTags,
            AppError::DuplicateTag("breakfast".to_string()),
            AppError::CookingTimeOutOfRange(-1),
            AppError::SelfFollow,
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert!(!err.is_server_error());
        }
    }

    #[test]
    fn test_conflict_status() {
        let err = AppError::AlreadyExists("favorite".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "ALREADY_EXISTS");
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(
            AppError::RecipeNotFound("r1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::UserNotFound("u1".to_string()).error_code(),
            "USER_NOT_FOUND"
        );
    }
}
