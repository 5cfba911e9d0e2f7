use sea_orm::entity::prelude::*;

/// A customer purchase. `total` is supplied by the writer and is not derived
/// from the order lines.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub customer_id: i32,
    pub order_date: DateTime,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total: Decimal,
    #[sea_orm(belongs_to, from = "customer_id", to = "id")]
    pub customer: HasOne<super::customer::Entity>,
    #[sea_orm(has_many)]
    pub order_lines: HasMany<super::order_line::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
