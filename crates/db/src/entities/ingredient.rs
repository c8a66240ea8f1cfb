//! Ingredient entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredient")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub name: String,

    pub measurement_unit_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::measurement_unit::Entity",
        from = "Column::MeasurementUnitId",
        to = "super::measurement_unit::Column::Id"
    )]
    MeasurementUnit,

    #[sea_orm(has_many = "super::recipe_ingredient::Entity")]
    RecipeIngredient,
}

impl Related<super::measurement_unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeasurementUnit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
