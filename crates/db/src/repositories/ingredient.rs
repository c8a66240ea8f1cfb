//! Ingredient repository.

use std::sync::Arc;

use crate::entities::{Ingredient, ingredient, measurement_unit};
use crate::repositories::{db_err, insert_err};
use foodgram_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

/// Ingredient joined with its measurement unit abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct IngredientWithUnit {
    pub id: String,
    pub name: String,
    pub unit: String,
}

#[cfg(any(test, feature = "mock"))]
impl sea_orm::IntoMockRow for IngredientWithUnit {
    fn into_mock_row(self) -> sea_orm::MockRow {
        use sea_orm::{IntoMockRow as _, Value};
        let mut values = std::collections::BTreeMap::new();
        values.insert("id".to_owned(), Value::from(self.id));
        values.insert("name".to_owned(), Value::from(self.name));
        values.insert("unit".to_owned(), Value::from(self.unit));
        values.into_mock_row()
    }
}

/// Ingredient repository for database operations.
#[derive(Clone)]
pub struct IngredientRepository {
    db: Arc<DatabaseConnection>,
}

impl IngredientRepository {
    /// Create a new ingredient repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an ingredient by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<ingredient::Model>> {
        Ingredient::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Find an ingredient by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<ingredient::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::IngredientNotFound(id.to_string()))
    }

    /// Find ingredients by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<ingredient::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Ingredient::find()
            .filter(ingredient::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Create a new ingredient.
    pub async fn create(&self, model: ingredient::ActiveModel) -> AppResult<ingredient::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| insert_err(e, "ingredient"))
    }

    /// Update an ingredient.
    pub async fn update(&self, model: ingredient::ActiveModel) -> AppResult<ingredient::Model> {
        model.update(self.db.as_ref()).await.map_err(db_err)
    }

    /// List ingredients with their unit abbreviations, optionally filtered by
    /// a case-insensitive name substring, ordered by name.
    pub async fn list_with_units(
        &self,
        name_filter: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<IngredientWithUnit>> {
        let mut query = Ingredient::find()
            .select_only()
            .column(ingredient::Column::Id)
            .column(ingredient::Column::Name)
            .column_as(measurement_unit::Column::Abbreviation, "unit")
            .join(
                JoinType::InnerJoin,
                ingredient::Relation::MeasurementUnit.def(),
            )
            .order_by_asc(ingredient::Column::Name);

        if let Some(fragment) = name_filter {
            let escaped = fragment
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            query = query.filter(
                Expr::col((ingredient::Entity, ingredient::Column::Name))
                    .ilike(format!("%{escaped}%")),
            );
        }

        query
            .limit(limit)
            .into_model::<IngredientWithUnit>()
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_ingredient(id: &str, name: &str) -> ingredient::Model {
        ingredient::Model {
            id: id.to_string(),
            name: name.to_string(),
            measurement_unit_id: "mu1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<ingredient::Model>::new()])
                .into_connection(),
        );

        let repo = IngredientRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::IngredientNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = IngredientRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_list_with_units() {
        let rows = vec![
            IngredientWithUnit {
                id: "i1".to_string(),
                name: "Salt".to_string(),
                unit: "g".to_string(),
            },
            IngredientWithUnit {
                id: "i2".to_string(),
                name: "Sugar".to_string(),
                unit: "g".to_string(),
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let repo = IngredientRepository::new(db);
        let result = repo.list_with_units(Some("S"), 10).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].unit, "g");
    }

    #[tokio::test]
    async fn test_name_filter_is_case_insensitive_substring() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<IngredientWithUnit>::new()])
                .into_connection(),
        );

        let repo = IngredientRepository::new(Arc::clone(&db));
        repo.list_with_units(Some("salt"), 10).await.unwrap();

        drop(repo);
        let log = Arc::into_inner(db).unwrap().into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("%salt%"));
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ingredient("i1", "Salt")]])
                .into_connection(),
        );

        let repo = IngredientRepository::new(db);
        let result = repo.find_by_id("i1").await.unwrap();

        assert_eq!(result.unwrap().name, "Salt");
    }
}
