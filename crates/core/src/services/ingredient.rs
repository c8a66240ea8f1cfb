//! Ingredient and measurement unit service.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::{ingredient, measurement_unit},
    repositories::{IngredientRepository, IngredientWithUnit, MeasurementUnitRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Ingredient service for business logic.
#[derive(Clone)]
pub struct IngredientService {
    ingredient_repo: IngredientRepository,
    unit_repo: MeasurementUnitRepository,
    id_gen: IdGenerator,
}

/// Input for creating a measurement unit.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMeasurementUnitInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1, max = 64))]
    pub abbreviation: String,
}

/// Input for creating an ingredient.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateIngredientInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub measurement_unit_id: String,
}

impl IngredientService {
    /// Create a new ingredient service.
    #[must_use]
    pub fn new(ingredient_repo: IngredientRepository, unit_repo: MeasurementUnitRepository) -> Self {
        Self {
            ingredient_repo,
            unit_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get an ingredient by ID.
    pub async fn get(&self, id: &str) -> AppResult<ingredient::Model> {
        self.ingredient_repo.get_by_id(id).await
    }

    /// Get an ingredient by ID together with its unit abbreviation.
    pub async fn get_with_unit(&self, id: &str) -> AppResult<IngredientWithUnit> {
        let ingredient = self.ingredient_repo.get_by_id(id).await?;
        let unit = self.unit_repo.get_by_id(&ingredient.measurement_unit_id).await?;

        Ok(IngredientWithUnit {
            id: ingredient.id,
            name: ingredient.name,
            unit: unit.abbreviation,
        })
    }

    /// List ingredients with unit abbreviations, optionally filtered by a
    /// case-insensitive name fragment.
    pub async fn list(
        &self,
        name_filter: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<IngredientWithUnit>> {
        self.ingredient_repo.list_with_units(name_filter, limit).await
    }

    /// List all measurement units.
    pub async fn list_units(&self) -> AppResult<Vec<measurement_unit::Model>> {
        self.unit_repo.list().await
    }

    /// Create a measurement unit (admin only, enforced at the API layer).
    pub async fn create_unit(
        &self,
        input: CreateMeasurementUnitInput,
    ) -> AppResult<measurement_unit::Model> {
        input.validate()?;

        if self
            .unit_repo
            .find_by_abbreviation(&input.abbreviation)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists("measurement unit".to_string()));
        }

        let model = measurement_unit::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            abbreviation: Set(input.abbreviation),
        };

        self.unit_repo.create(model).await
    }

    /// Create an ingredient (admin only, enforced at the API layer).
    pub async fn create(&self, input: CreateIngredientInput) -> AppResult<ingredient::Model> {
        input.validate()?;

        // The unit must exist before an ingredient can reference it
        self.unit_repo.get_by_id(&input.measurement_unit_id).await?;

        let model = ingredient::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            measurement_unit_id: Set(input.measurement_unit_id),
        };

        self.ingredient_repo.create(model).await
    }

    /// Update an ingredient's name and unit (admin only, enforced at the API layer).
    pub async fn update(
        &self,
        id: &str,
        input: CreateIngredientInput,
    ) -> AppResult<ingredient::Model> {
        input.validate()?;

        let existing = self.ingredient_repo.get_by_id(id).await?;
        self.unit_repo.get_by_id(&input.measurement_unit_id).await?;

        let model = ingredient::ActiveModel {
            id: Set(existing.id),
            name: Set(input.name),
            measurement_unit_id: Set(input.measurement_unit_id),
        };

        self.ingredient_repo.update(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn make_service(db: Arc<sea_orm::DatabaseConnection>) -> IngredientService {
        IngredientService::new(
            IngredientRepository::new(db.clone()),
            MeasurementUnitRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_create_requires_existing_unit() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<measurement_unit::Model>::new()])
                .into_connection(),
        );

        let service = make_service(db);
        let result = service
            .create(CreateIngredientInput {
                name: "Salt".to_string(),
                measurement_unit_id: "missing".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_with_name_filter() {
        let rows = vec![IngredientWithUnit {
            id: "i1".to_string(),
            name: "Salt".to_string(),
            unit: "g".to_string(),
        }];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let service = make_service(db);
        let result = service.list(Some("Sa"), 10).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Salt");
    }
}
