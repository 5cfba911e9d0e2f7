use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{
    DatabaseConnection, DatabaseTransaction, EntityTrait, Set, TransactionTrait, prelude::Decimal,
};
use serde::Serialize;
use tracing::{error, info, warn};

use super::entities::{
    category, customer, dish, dish_ingredient, ingredient, order, order_line, review, supplier,
};
use crate::error::{RestaurantError, RestaurantResult};

/// A complete dataset, one row set per table.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub categories: Vec<category::ActiveModel>,
    pub suppliers: Vec<supplier::ActiveModel>,
    pub dishes: Vec<dish::ActiveModel>,
    pub customers: Vec<customer::ActiveModel>,
    pub orders: Vec<order::ActiveModel>,
    pub ingredients: Vec<ingredient::ActiveModel>,
    pub order_lines: Vec<order_line::ActiveModel>,
    pub dish_ingredients: Vec<dish_ingredient::ActiveModel>,
    pub reviews: Vec<review::ActiveModel>,
}

/// Rows inserted per table by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub categories: u64,
    pub suppliers: u64,
    pub dishes: u64,
    pub customers: u64,
    pub orders: u64,
    pub ingredients: u64,
    pub order_lines: u64,
    pub dish_ingredients: u64,
    pub reviews: u64,
}

impl SeedSummary {
    pub fn total(&self) -> u64 {
        self.categories
            + self.suppliers
            + self.dishes
            + self.customers
            + self.orders
            + self.ingredients
            + self.order_lines
            + self.dish_ingredients
            + self.reviews
    }
}

/// Inserts `data` in one transaction. Any failure rolls back every row.
///
/// The seeder is meant for a freshly created schema: running it twice fails
/// on the first duplicate key and leaves the existing rows untouched.
pub async fn seed(db: &DatabaseConnection, data: &SeedData) -> RestaurantResult<SeedSummary> {
    let txn = db
        .begin()
        .await
        .map_err(|err| RestaurantError::connectivity("begin seed transaction", err))?;

    match insert_all(&txn, data).await {
        Ok(summary) => {
            txn.commit()
                .await
                .map_err(|err| RestaurantError::connectivity("commit seed transaction", err))?;
            info!(rows = summary.total(), "sample data inserted");
            Ok(summary)
        }
        Err(err) => {
            error!(error = %err, "seeding failed, rolling back");
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback reported an error");
            }
            Err(err)
        }
    }
}

async fn insert_all(txn: &DatabaseTransaction, data: &SeedData) -> RestaurantResult<SeedSummary> {
    Ok(SeedSummary {
        categories: insert_rows::<category::Entity>(txn, "categories", &data.categories).await?,
        suppliers: insert_rows::<supplier::Entity>(txn, "suppliers", &data.suppliers).await?,
        dishes: insert_rows::<dish::Entity>(txn, "dishes", &data.dishes).await?,
        customers: insert_rows::<customer::Entity>(txn, "customers", &data.customers).await?,
        orders: insert_rows::<order::Entity>(txn, "orders", &data.orders).await?,
        ingredients: insert_rows::<ingredient::Entity>(txn, "ingredients", &data.ingredients)
            .await?,
        order_lines: insert_rows::<order_line::Entity>(txn, "order_lines", &data.order_lines)
            .await?,
        dish_ingredients: insert_rows::<dish_ingredient::Entity>(
            txn,
            "dish_ingredients",
            &data.dish_ingredients,
        )
        .await?,
        reviews: insert_rows::<review::Entity>(txn, "reviews", &data.reviews).await?,
    })
}

async fn insert_rows<E>(
    txn: &DatabaseTransaction,
    table: &'static str,
    rows: &[E::ActiveModel],
) -> RestaurantResult<u64>
where
    E: EntityTrait,
    E::ActiveModel: Clone + Send,
{
    if rows.is_empty() {
        return Ok(0);
    }
    let inserted = E::insert_many(rows.to_vec())
        .exec_without_returning(txn)
        .await
        .map_err(|err| RestaurantError::insert(table, err))?;
    info!(table, rows = inserted, "inserted rows");
    Ok(inserted)
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("seed timestamps are valid calendar dates")
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn millis(thousandths: i64) -> Decimal {
    Decimal::new(thousandths, 3)
}

impl SeedData {
    /// The fixed restaurant dataset: 5 categories, 4 suppliers, 10 dishes,
    /// 5 customers, 6 orders, 8 ingredients, 15 order lines, 12 recipe links
    /// and 5 reviews.
    pub fn sample() -> Self {
        let categories = [
            (1, "Entrée"),
            (2, "Plat principal"),
            (3, "Dessert"),
            (4, "Boisson"),
            (5, "Végétarien"),
        ]
        .into_iter()
        .map(|(id, name)| category::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            ..Default::default()
        })
        .collect();

        let suppliers = [
            (1, "AgriFresh", "contact@agrifresh.com"),
            (2, "MeatSupplier", "info@meatsupplier.com"),
            (3, "BevCo", "sales@bevco.com"),
            (4, "DairyFarm", "dairy@farm.com"),
        ]
        .into_iter()
        .map(|(id, name, contact)| supplier::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            contact: Set(contact.to_string()),
            ..Default::default()
        })
        .collect();

        let dishes = [
            (1, "Salade César", 4500, "Salade avec poulet grillé", 1),
            (2, "Soupe de légumes", 3000, "Soupe chaude de saison", 1),
            (3, "Steak frites", 9000, "Viande grillée et frites", 2),
            (4, "Pizza Margherita", 7000, "Pizza tomate & mozzarella", 2),
            (5, "Tiramisu", 3500, "Dessert italien", 3),
            (6, "Glace 2 boules", 2500, "Glace au choix", 3),
            (7, "Coca-Cola", 1500, "Boisson gazeuse", 4),
            (8, "Eau minérale", 1000, "Eau plate ou gazeuse", 4),
            (9, "Curry de légumes", 6500, "Plat végétarien épicé", 5),
            (10, "Falafel wrap", 5000, "Wrap avec falafels et légumes", 5),
        ]
        .into_iter()
        .map(|(id, name, price, description, category_id)| dish::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            price: Set(money(price)),
            description: Set(Some(description.to_string())),
            category_id: Set(category_id),
            ..Default::default()
        })
        .collect();

        let customers = [
            (1, "Amine Lahmidi", "amine@example.com", Some("+212600123456")),
            (2, "Sara Benali", "sara.b@example.com", Some("+212600654321")),
            (3, "Youssef El Khalfi", "youssef.k@example.com", None),
            (4, "Fatima Zahra", "fatima.z@example.com", Some("+212600987654")),
            (5, "Omar Alaoui", "omar.a@example.com", Some("+212600112233")),
        ]
        .into_iter()
        .map(|(id, name, email, phone)| customer::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            phone: Set(phone.map(str::to_string)),
            ..Default::default()
        })
        .collect();

        let orders = [
            (1, 1, at(2025, 7, 7, 12, 30), 12000),
            (2, 2, at(2025, 7, 7, 13, 0), 8500),
            (3, 1, at(2025, 7, 8, 19, 45), 15000),
            (4, 3, at(2025, 8, 15, 18, 30), 20000),
            (5, 4, at(2025, 9, 1, 20, 0), 9500),
            (6, 5, at(2025, 9, 10, 12, 15), 7500),
        ]
        .into_iter()
        .map(|(id, customer_id, order_date, total)| order::ActiveModel {
            id: Set(id),
            customer_id: Set(customer_id),
            order_date: Set(order_date),
            total: Set(money(total)),
            ..Default::default()
        })
        .collect();

        let ingredients = [
            (1, "Poulet", 1500, 50_000, 2),
            (2, "Laitue", 500, 20_000, 1),
            (3, "Tomate", 300, 30_000, 1),
            (4, "Mozzarella", 1000, 15_000, 4),
            (5, "Pomme de terre", 200, 100_000, 1),
            (6, "Café", 2000, 5_000, 3),
            (7, "Sucre", 150, 25_000, 3),
            (8, "Pois chiches", 400, 40_000, 1),
        ]
        .into_iter()
        .map(|(id, name, unit_cost, stock, supplier_id)| ingredient::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            unit_cost: Set(money(unit_cost)),
            stock: Set(millis(stock)),
            supplier_id: Set(supplier_id),
            ..Default::default()
        })
        .collect();

        let order_lines = [
            (1, 1, 1),
            (1, 3, 1),
            (1, 7, 2),
            (2, 2, 1),
            (2, 4, 1),
            (2, 8, 1),
            (3, 3, 1),
            (3, 5, 1),
            (3, 7, 1),
            (4, 4, 2),
            (4, 9, 1),
            (5, 10, 1),
            (5, 8, 2),
            (6, 7, 3),
            (6, 6, 1),
        ]
        .into_iter()
        .map(|(order_id, dish_id, quantity)| order_line::ActiveModel {
            order_id: Set(order_id),
            dish_id: Set(dish_id),
            quantity: Set(quantity),
            ..Default::default()
        })
        .collect();

        let dish_ingredients = [
            (1, 1, 200),
            (1, 2, 100),
            (2, 2, 50),
            (2, 5, 100),
            (3, 1, 300),
            (3, 5, 200),
            (4, 3, 100),
            (4, 4, 150),
            (5, 6, 50),
            (5, 7, 20),
            (9, 8, 100),
            (10, 8, 150),
        ]
        .into_iter()
        .map(|(dish_id, ingredient_id, needed)| dish_ingredient::ActiveModel {
            dish_id: Set(dish_id),
            ingredient_id: Set(ingredient_id),
            quantity_needed: Set(millis(needed)),
            ..Default::default()
        })
        .collect();

        let reviews = [
            (1, 1, 1, 4, "Très frais, poulet bien cuit", at(2025, 7, 7, 13, 0)),
            (2, 2, 4, 5, "Meilleure pizza du coin !", at(2025, 7, 7, 14, 0)),
            (3, 3, 9, 3, "Un peu trop épicé", at(2025, 8, 15, 19, 0)),
            (4, 4, 10, 4, "Bon, mais manque de sauce", at(2025, 9, 1, 21, 0)),
            (5, 5, 6, 5, "Glace délicieuse", at(2025, 9, 10, 13, 0)),
        ]
        .into_iter()
        .map(
            |(id, customer_id, dish_id, rating, comment, review_date)| review::ActiveModel {
                id: Set(id),
                customer_id: Set(customer_id),
                dish_id: Set(dish_id),
                rating: Set(rating),
                comment: Set(Some(comment.to_string())),
                review_date: Set(review_date),
                ..Default::default()
            },
        )
        .collect();

        Self {
            categories,
            suppliers,
            dishes,
            customers,
            orders,
            ingredients,
            order_lines,
            dish_ingredients,
            reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SeedData;

    #[test]
    fn sample_has_the_documented_shape() {
        let data = SeedData::sample();

        assert_eq!(data.categories.len(), 5);
        assert_eq!(data.suppliers.len(), 4);
        assert_eq!(data.dishes.len(), 10);
        assert_eq!(data.customers.len(), 5);
        assert_eq!(data.orders.len(), 6);
        assert_eq!(data.ingredients.len(), 8);
        assert_eq!(data.order_lines.len(), 15);
        assert_eq!(data.dish_ingredients.len(), 12);
        assert_eq!(data.reviews.len(), 5);
    }
}
