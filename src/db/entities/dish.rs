use sea_orm::entity::prelude::*;

/// A menu item. Prices are stored as `decimal(10, 2)`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dishes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub description: Option<String>,
    pub category_id: i32,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::category::Entity>,
    #[sea_orm(has_many)]
    pub order_lines: HasMany<super::order_line::Entity>,
    #[sea_orm(has_many)]
    pub dish_ingredients: HasMany<super::dish_ingredient::Entity>,
    #[sea_orm(has_many)]
    pub reviews: HasMany<super::review::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
