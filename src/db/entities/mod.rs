#[allow(unused_imports)]
pub mod prelude {
    pub use super::category::Entity as Category;
    pub use super::customer::Entity as Customer;
    pub use super::dish::Entity as Dish;
    pub use super::dish_ingredient::Entity as DishIngredient;
    pub use super::ingredient::Entity as Ingredient;
    pub use super::order::Entity as Order;
    pub use super::order_line::Entity as OrderLine;
    pub use super::review::Entity as Review;
    pub use super::supplier::Entity as Supplier;
}

pub mod category;
pub mod customer;
pub mod dish;
pub mod dish_ingredient;
pub mod ingredient;
pub mod order;
pub mod order_line;
pub mod review;
pub mod supplier;
