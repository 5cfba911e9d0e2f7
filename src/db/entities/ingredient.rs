use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 3)))")]
    pub stock: Decimal,
    pub supplier_id: i32,
    #[sea_orm(belongs_to, from = "supplier_id", to = "id")]
    pub supplier: HasOne<super::supplier::Entity>,
    #[sea_orm(has_many)]
    pub dish_ingredients: HasMany<super::dish_ingredient::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
