use sea_orm::entity::prelude::*;

/// Quantity of one dish within one order.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "order_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub dish_id: i32,
    #[sea_orm(default_value = 1)]
    pub quantity: i32,
    #[sea_orm(belongs_to, from = "order_id", to = "id")]
    pub order: HasOne<super::order::Entity>,
    #[sea_orm(belongs_to, from = "dish_id", to = "id")]
    pub dish: HasOne<super::dish::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
