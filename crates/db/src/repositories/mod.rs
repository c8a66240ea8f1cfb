//! Database repositories.

use foodgram_common::AppError;
use sea_orm::{DbErr, SqlErr};

pub mod favorite;
pub mod follow;
pub mod ingredient;
pub mod measurement_unit;
pub mod recipe;
pub mod shopping_cart;
pub mod tag;
pub mod user;

pub use favorite::FavoriteRepository;
pub use follow::FollowRepository;
pub use ingredient::{IngredientRepository, IngredientWithUnit};
pub use measurement_unit::MeasurementUnitRepository;
pub use recipe::{RecipeFilter, RecipeIngredientRow, RecipeRepository};
pub use shopping_cart::{CartIngredientRow, ShoppingCartRepository};
pub use tag::TagRepository;
pub use user::UserRepository;

/// Map a database error to the application error type.
pub(crate) fn db_err(e: DbErr) -> AppError {
    AppError::Database(e.to_string())
}

/// Map an insert error, treating a unique-constraint violation as
/// [`AppError::AlreadyExists`].
///
/// The uniqueness constraint is the authority for duplicate pairs; a
/// read-then-write existence check would race concurrent inserts.
pub(crate) fn insert_err(e: DbErr, what: &str) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::AlreadyExists(what.to_string()),
        _ => AppError::Database(e.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_err_passes_through_other_errors() {
        let err = insert_err(DbErr::Custom("boom".to_string()), "favorite");
        assert!(matches!(err, AppError::Database(_)));
    }
}
