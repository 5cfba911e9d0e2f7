use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use crate::db::reports::{
    CategoryRevenue, CustomerLoyalty, CustomerOrder, DishPopularity, DishRating,
    DishWithCategory, OrderTotalAudit, ReportSet,
};

const CURRENCY: &str = "DH";

/// A report row that can be laid out as a text table.
pub trait TableRow {
    const HEADERS: &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRow for DishWithCategory {
    const HEADERS: &'static [&'static str] = &["dish", "price", "category"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.dish.clone(),
            format!("{:.2} {CURRENCY}", self.price),
            self.category.clone(),
        ]
    }
}

impl TableRow for CustomerOrder {
    const HEADERS: &'static [&'static str] = &["order", "date", "total"];

    fn cells(&self) -> Vec<String> {
        vec![
            format!("#{}", self.order_id),
            self.order_date.format("%Y-%m-%d %H:%M").to_string(),
            format!("{:.2} {CURRENCY}", self.total),
        ]
    }
}

impl TableRow for DishPopularity {
    const HEADERS: &'static [&'static str] = &["dish", "times ordered"];

    fn cells(&self) -> Vec<String> {
        vec![self.dish.clone(), self.times_ordered.to_string()]
    }
}

impl TableRow for CategoryRevenue {
    const HEADERS: &'static [&'static str] = &["category", "revenue"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            format!("{:.2} {CURRENCY}", self.revenue),
        ]
    }
}

impl TableRow for CustomerLoyalty {
    const HEADERS: &'static [&'static str] = &["customer", "orders", "total spent"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.customer.clone(),
            self.order_count.to_string(),
            format!("{:.2} {CURRENCY}", self.total_spent),
        ]
    }
}

impl TableRow for DishRating {
    const HEADERS: &'static [&'static str] = &["dish", "average", "reviews"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.dish.clone(),
            format!("{:.1}/5", self.average_rating),
            self.review_count.to_string(),
        ]
    }
}

impl TableRow for OrderTotalAudit {
    const HEADERS: &'static [&'static str] = &["order", "recorded", "from lines", "matches"];

    fn cells(&self) -> Vec<String> {
        vec![
            format!("#{}", self.order_id),
            format!("{:.2} {CURRENCY}", self.recorded_total),
            format!("{:.2} {CURRENCY}", self.computed_total),
            if self.matches { "yes" } else { "no" }.to_string(),
        ]
    }
}

/// Lays out `rows` under a title as a bordered table.
pub fn table<R: TableRow>(title: &str, rows: &[R]) -> String {
    let mut grid = Table::new();
    grid.load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(R::HEADERS.iter().map(|header| Cell::new(header)));
    for row in rows {
        grid.add_row(row.cells());
    }

    let mut out = format!("{title}\n{grid}\n");
    if rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

/// Text rendering of every report present in `set`.
pub fn text(set: &ReportSet, customer: &str) -> String {
    let mut sections = Vec::new();
    if let Some(rows) = &set.dishes_with_category {
        sections.push(table("Dishes by category", rows));
    }
    if let Some(rows) = &set.orders_for_customer {
        sections.push(table(&format!("Orders for {customer}"), rows));
    }
    if let Some(rows) = &set.top_dishes {
        sections.push(table("Most ordered dishes", rows));
    }
    if let Some(rows) = &set.revenue_by_category {
        sections.push(table("Revenue by category", rows));
    }
    if let Some(rows) = &set.customer_loyalty {
        sections.push(table("Most loyal customers", rows));
    }
    if let Some(rows) = &set.average_ratings {
        sections.push(table("Average rating per dish", rows));
    }
    if let Some(rows) = &set.order_total_audit {
        sections.push(table("Order totals vs. order lines", rows));
    }
    sections.join("\n")
}

pub fn json(set: &ReportSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(set)
}

#[cfg(test)]
mod tests {
    use sea_orm::prelude::Decimal;

    use super::{json, table, text};
    use crate::db::reports::{CategoryRevenue, DishPopularity, ReportSet};

    #[test]
    fn rows_are_laid_out_in_aligned_columns() {
        let rows = vec![
            CategoryRevenue {
                category: "Plat principal".to_string(),
                revenue: Decimal::new(39000, 2),
            },
            CategoryRevenue {
                category: "Entrée".to_string(),
                revenue: Decimal::new(7500, 2),
            },
        ];

        let rendered = table("Revenue by category", &rows);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Revenue by category");
        let header = lines.iter().position(|l| l.contains("category")).expect("header");
        let first = lines.iter().position(|l| l.contains("Plat principal")).expect("row");
        let second = lines.iter().position(|l| l.contains("Entrée")).expect("row");
        assert!(header < first && first < second);
        assert!(lines[first].contains("390.00 DH"));
        assert!(lines[second].contains("75.00 DH"));
        assert_eq!(
            lines[first].chars().count(),
            lines[second].chars().count()
        );
    }

    #[test]
    fn empty_reports_say_so() {
        let rendered = table::<DishPopularity>("Most ordered dishes", &[]);
        assert!(rendered.ends_with("(no rows)\n"));
    }

    #[test]
    fn only_requested_reports_are_rendered() {
        let set = ReportSet {
            top_dishes: Some(vec![DishPopularity {
                dish: "Coca-Cola".to_string(),
                times_ordered: 6,
            }]),
            ..ReportSet::default()
        };

        let rendered = text(&set, "Amine Lahmidi");
        assert!(rendered.contains("Most ordered dishes"));
        assert!(!rendered.contains("Revenue by category"));

        let value: serde_json::Value =
            serde_json::from_str(&json(&set).expect("serialize")).expect("valid json");
        assert_eq!(value["top_dishes"][0]["times_ordered"], 6);
        assert!(value.get("revenue_by_category").is_none());
    }

    #[test]
    fn money_is_serialized_as_exact_strings() {
        let set = ReportSet {
            revenue_by_category: Some(vec![CategoryRevenue {
                category: "Plat principal".to_string(),
                revenue: Decimal::new(39000, 2),
            }]),
            ..ReportSet::default()
        };

        let value: serde_json::Value =
            serde_json::from_str(&json(&set).expect("serialize")).expect("valid json");
        assert_eq!(value["revenue_by_category"][0]["revenue"], "390.00");
    }
}
