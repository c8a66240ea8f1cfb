//! Measurement unit repository.

use std::sync::Arc;

use crate::entities::{MeasurementUnit, measurement_unit};
use crate::repositories::{db_err, insert_err};
use foodgram_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Measurement unit repository for database operations.
#[derive(Clone)]
pub struct MeasurementUnitRepository {
    db: Arc<DatabaseConnection>,
}

impl MeasurementUnitRepository {
    /// Create a new measurement unit repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a unit by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<measurement_unit::Model>> {
        MeasurementUnit::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Find a unit by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<measurement_unit::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("measurement unit {id}")))
    }

    /// Find a unit by its abbreviation.
    pub async fn find_by_abbreviation(
        &self,
        abbreviation: &str,
    ) -> AppResult<Option<measurement_unit::Model>> {
        MeasurementUnit::find()
            .filter(measurement_unit::Column::Abbreviation.eq(abbreviation))
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Create a new unit.
    pub async fn create(
        &self,
        model: measurement_unit::ActiveModel,
    ) -> AppResult<measurement_unit::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| insert_err(e, "measurement unit"))
    }

    /// List all units, ordered by name.
    pub async fn list(&self) -> AppResult<Vec<measurement_unit::Model>> {
        MeasurementUnit::find()
            .order_by_asc(measurement_unit::Column::Name)
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

    fn gram() -> measurement_unit::Model {
        measurement_unit::Model {
            id: "mu1".to_string(),
            name: "gram".to_string(),
            abbreviation: "g".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<measurement_unit::Model>::new()])
                .into_connection(),
        );

        let repo = MeasurementUnitRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_abbreviation() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[gram()]])
                .into_connection(),
        );

        let repo = MeasurementUnitRepository::new(db);
        let result = repo.find_by_abbreviation("g").await.unwrap();

        assert_eq!(result.unwrap().name, "gram");
    }
}
