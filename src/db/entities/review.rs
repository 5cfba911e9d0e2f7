use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub customer_id: i32,
    pub dish_id: i32,
    pub rating: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: Option<String>,
    pub review_date: DateTime,
    #[sea_orm(belongs_to, from = "customer_id", to = "id")]
    pub customer: HasOne<super::customer::Entity>,
    #[sea_orm(belongs_to, from = "dish_id", to = "id")]
    pub dish: HasOne<super::dish::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
