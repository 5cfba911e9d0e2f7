use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, Related,
    prelude::{DateTime, Decimal},
    sea_query::{Expr, ExprTrait, Func},
};
use serde::Serialize;
use tracing::{debug, error};

use super::entities::{category, customer, dish, order, order_line, review};
use crate::error::{RestaurantError, RestaurantResult};

pub const DEFAULT_CUSTOMER: &str = "Amine Lahmidi";
pub const DEFAULT_TOP_LIMIT: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct DishWithCategory {
    pub dish: String,
    pub price: Decimal,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct CustomerOrder {
    pub order_id: i32,
    pub order_date: DateTime,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct DishPopularity {
    pub dish: String,
    pub times_ordered: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct CustomerLoyalty {
    pub customer: String,
    pub order_count: i64,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct DishRating {
    pub dish: String,
    pub average_rating: Decimal,
    pub review_count: i64,
}

/// Stored order total next to the total implied by its lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderTotalAudit {
    pub order_id: i32,
    pub recorded_total: Decimal,
    pub computed_total: Decimal,
    pub matches: bool,
}

#[derive(Debug, FromQueryResult)]
struct OrderTotalRow {
    order_id: i32,
    recorded_total: Decimal,
    computed_total: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub customer: String,
    pub top: u64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            customer: DEFAULT_CUSTOMER.to_string(),
            top: DEFAULT_TOP_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Dishes,
    CustomerOrders,
    TopDishes,
    Revenue,
    Loyalty,
    Ratings,
    Audit,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::Dishes,
        ReportKind::CustomerOrders,
        ReportKind::TopDishes,
        ReportKind::Revenue,
        ReportKind::Loyalty,
        ReportKind::Ratings,
        ReportKind::Audit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportKind::Dishes => "dishes_with_category",
            ReportKind::CustomerOrders => "orders_for_customer",
            ReportKind::TopDishes => "top_dishes",
            ReportKind::Revenue => "revenue_by_category",
            ReportKind::Loyalty => "customer_loyalty",
            ReportKind::Ratings => "average_ratings",
            ReportKind::Audit => "order_total_audit",
        }
    }
}

/// Results of one reporting run. Reports that were not requested stay `None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dishes_with_category: Option<Vec<DishWithCategory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders_for_customer: Option<Vec<CustomerOrder>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_dishes: Option<Vec<DishPopularity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_by_category: Option<Vec<CategoryRevenue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_loyalty: Option<Vec<CustomerLoyalty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_ratings: Option<Vec<DishRating>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_total_audit: Option<Vec<OrderTotalAudit>>,
}

fn fail(report: &'static str, err: sea_orm::DbErr) -> RestaurantError {
    let err = RestaurantError::query(report, err);
    error!(report, error = %err, "report failed");
    err
}

/// Read-only reporting queries. Every result is fully ordered, so repeated
/// runs over the same data return identical rows.
#[derive(Clone, Copy)]
pub struct Reports<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> Reports<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every dish with its category, by category name then ascending price.
    pub async fn dishes_with_category(&self) -> RestaurantResult<Vec<DishWithCategory>> {
        dish::Entity::find()
            .select_only()
            .column_as(dish::Column::Name, "dish")
            .column(dish::Column::Price)
            .column_as(category::Column::Name, "category")
            .inner_join(category::Entity)
            .order_by_asc(category::Column::Name)
            .order_by_asc(dish::Column::Price)
            .order_by_asc(dish::Column::Id)
            .into_model::<DishWithCategory>()
            .all(self.db)
            .await
            .map_err(|err| fail(ReportKind::Dishes.name(), err))
    }

    /// Orders placed by the customer whose name matches exactly, oldest first.
    pub async fn orders_for_customer(&self, name: &str) -> RestaurantResult<Vec<CustomerOrder>> {
        order::Entity::find()
            .select_only()
            .column_as(order::Column::Id, "order_id")
            .column(order::Column::OrderDate)
            .column(order::Column::Total)
            .inner_join(customer::Entity)
            .filter(customer::Column::Name.eq(name))
            .order_by_asc(order::Column::OrderDate)
            .order_by_asc(order::Column::Id)
            .into_model::<CustomerOrder>()
            .all(self.db)
            .await
            .map_err(|err| fail(ReportKind::CustomerOrders.name(), err))
    }

    /// The `limit` dishes with the highest ordered quantity. Ties go to the
    /// lower dish id.
    pub async fn top_dishes(&self, limit: u64) -> RestaurantResult<Vec<DishPopularity>> {
        let times_ordered = || {
            Expr::from(Func::sum(Expr::col((
                order_line::Entity,
                order_line::Column::Quantity,
            ))))
        };

        dish::Entity::find()
            .select_only()
            .column_as(dish::Column::Name, "dish")
            .column_as(times_ordered(), "times_ordered")
            .inner_join(order_line::Entity)
            .group_by(dish::Column::Id)
            .group_by(dish::Column::Name)
            .order_by_desc(times_ordered())
            .order_by_asc(dish::Column::Id)
            .limit(limit)
            .into_model::<DishPopularity>()
            .all(self.db)
            .await
            .map_err(|err| fail(ReportKind::TopDishes.name(), err))
    }

    /// Sum of price times quantity over every order line, per category.
    pub async fn revenue_by_category(&self) -> RestaurantResult<Vec<CategoryRevenue>> {
        let revenue = || Expr::from(Func::sum(line_amount()));

        category::Entity::find()
            .select_only()
            .column_as(category::Column::Name, "category")
            .column_as(revenue(), "revenue")
            .inner_join(dish::Entity)
            .join(
                JoinType::InnerJoin,
                <dish::Entity as Related<order_line::Entity>>::to(),
            )
            .group_by(category::Column::Id)
            .group_by(category::Column::Name)
            .order_by_desc(revenue())
            .order_by_asc(category::Column::Id)
            .into_model::<CategoryRevenue>()
            .all(self.db)
            .await
            .map_err(|err| fail(ReportKind::Revenue.name(), err))
    }

    /// Customers with at least one order, most orders first.
    pub async fn customer_loyalty(&self) -> RestaurantResult<Vec<CustomerLoyalty>> {
        let order_count = || Expr::from(Func::count(Expr::col((order::Entity, order::Column::Id))));

        customer::Entity::find()
            .select_only()
            .column_as(customer::Column::Name, "customer")
            .column_as(order_count(), "order_count")
            .column_as(
                Expr::from(Func::sum(Expr::col((order::Entity, order::Column::Total)))),
                "total_spent",
            )
            .inner_join(order::Entity)
            .group_by(customer::Column::Id)
            .group_by(customer::Column::Name)
            .order_by_desc(order_count())
            .order_by_asc(customer::Column::Id)
            .into_model::<CustomerLoyalty>()
            .all(self.db)
            .await
            .map_err(|err| fail(ReportKind::Loyalty.name(), err))
    }

    /// Mean rating of every reviewed dish, best first.
    pub async fn average_ratings(&self) -> RestaurantResult<Vec<DishRating>> {
        let average = || Expr::from(Func::avg(Expr::col((review::Entity, review::Column::Rating))));

        dish::Entity::find()
            .select_only()
            .column_as(dish::Column::Name, "dish")
            .column_as(average(), "average_rating")
            .column_as(
                Expr::from(Func::count(Expr::col((review::Entity, review::Column::Id)))),
                "review_count",
            )
            .inner_join(review::Entity)
            .group_by(dish::Column::Id)
            .group_by(dish::Column::Name)
            .order_by_desc(average())
            .order_by_asc(dish::Column::Id)
            .into_model::<DishRating>()
            .all(self.db)
            .await
            .map_err(|err| fail(ReportKind::Ratings.name(), err))
    }

    /// Every order with its stored total and the total implied by its lines.
    /// An order without lines has a computed total of zero.
    pub async fn order_total_audit(&self) -> RestaurantResult<Vec<OrderTotalAudit>> {
        let rows = order::Entity::find()
            .select_only()
            .column_as(order::Column::Id, "order_id")
            .column_as(order::Column::Total, "recorded_total")
            .column_as(Expr::from(Func::sum(line_amount())), "computed_total")
            .left_join(order_line::Entity)
            .join(
                JoinType::LeftJoin,
                <order_line::Entity as Related<dish::Entity>>::to(),
            )
            .group_by(order::Column::Id)
            .group_by(order::Column::Total)
            .order_by_asc(order::Column::Id)
            .into_model::<OrderTotalRow>()
            .all(self.db)
            .await
            .map_err(|err| fail(ReportKind::Audit.name(), err))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let computed_total = row.computed_total.unwrap_or(Decimal::ZERO);
                OrderTotalAudit {
                    order_id: row.order_id,
                    recorded_total: row.recorded_total,
                    computed_total,
                    matches: computed_total == row.recorded_total,
                }
            })
            .collect())
    }

    pub async fn run(
        &self,
        kind: ReportKind,
        options: &ReportOptions,
        set: &mut ReportSet,
    ) -> RestaurantResult<()> {
        debug!(report = kind.name(), "running report");
        match kind {
            ReportKind::Dishes => set.dishes_with_category = Some(self.dishes_with_category().await?),
            ReportKind::CustomerOrders => {
                set.orders_for_customer = Some(self.orders_for_customer(&options.customer).await?)
            }
            ReportKind::TopDishes => set.top_dishes = Some(self.top_dishes(options.top).await?),
            ReportKind::Revenue => set.revenue_by_category = Some(self.revenue_by_category().await?),
            ReportKind::Loyalty => set.customer_loyalty = Some(self.customer_loyalty().await?),
            ReportKind::Ratings => set.average_ratings = Some(self.average_ratings().await?),
            ReportKind::Audit => set.order_total_audit = Some(self.order_total_audit().await?),
        }
        Ok(())
    }

    /// Runs every report in a fixed order. The first failure aborts the run.
    pub async fn run_all(&self, options: &ReportOptions) -> RestaurantResult<ReportSet> {
        let mut set = ReportSet::default();
        for kind in ReportKind::ALL {
            self.run(kind, options, &mut set).await?;
        }
        Ok(set)
    }
}

fn line_amount() -> Expr {
    Expr::col((dish::Entity, dish::Column::Price))
        .mul(Expr::col((order_line::Entity, order_line::Column::Quantity)))
}
