use sea_orm::entity::prelude::*;

/// Recipe composition: how much of an ingredient one dish needs.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dish_ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub dish_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ingredient_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 3)))")]
    pub quantity_needed: Decimal,
    #[sea_orm(belongs_to, from = "dish_id", to = "id")]
    pub dish: HasOne<super::dish::Entity>,
    #[sea_orm(belongs_to, from = "ingredient_id", to = "id")]
    pub ingredient: HasOne<super::ingredient::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
