use restaurant_db::{
    db::{RestaurantDb, SeedData, TABLES},
    error::{ErrorCategory, IntegrityKind, RestaurantError},
    test_helpers::memory_db_with_schema,
};
use sea_orm::{FromQueryResult, Set, Statement};

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

async fn row_count(db: &RestaurantDb, table: &str) -> i64 {
    let conn = db.connection();
    CountRow::find_by_statement(Statement::from_string(
        conn.get_database_backend(),
        format!("SELECT COUNT(*) AS count FROM \"{table}\""),
    ))
    .one(conn)
    .await
    .expect("count rows")
    .expect("count row")
    .count
}

async fn total_rows(db: &RestaurantDb) -> i64 {
    let mut total = 0;
    for table in TABLES {
        total += row_count(db, table).await;
    }
    total
}

#[tokio::test]
async fn sample_data_is_inserted_completely() {
    let db = memory_db_with_schema().await;

    let summary = db.seed(&SeedData::sample()).await.expect("seed");

    assert_eq!(summary.categories, 5);
    assert_eq!(summary.suppliers, 4);
    assert_eq!(summary.dishes, 10);
    assert_eq!(summary.customers, 5);
    assert_eq!(summary.orders, 6);
    assert_eq!(summary.ingredients, 8);
    assert_eq!(summary.order_lines, 15);
    assert_eq!(summary.dish_ingredients, 12);
    assert_eq!(summary.reviews, 5);
    assert_eq!(total_rows(&db).await, 70);
    assert_eq!(row_count(&db, "order_lines").await, 15);
}

#[tokio::test]
async fn failing_late_batch_rolls_back_everything() {
    let db = memory_db_with_schema().await;
    let mut data = SeedData::sample();
    data.reviews[0].dish_id = Set(999);

    let err = db.seed(&data).await.expect_err("seed should fail");

    assert!(matches!(
        err,
        RestaurantError::Integrity {
            entity: "reviews",
            kind: IntegrityKind::ForeignKeyViolation,
            ..
        }
    ));
    assert_eq!(total_rows(&db).await, 0);
}

#[tokio::test]
async fn reseeding_fails_and_keeps_existing_rows() {
    let db = memory_db_with_schema().await;
    db.seed(&SeedData::sample()).await.expect("first seed");

    let err = db
        .seed(&SeedData::sample())
        .await
        .expect_err("second seed should fail");

    assert_eq!(err.category(), ErrorCategory::Integrity);
    assert!(matches!(
        err,
        RestaurantError::Integrity {
            entity: "categories",
            ..
        }
    ));
    assert_eq!(total_rows(&db).await, 70);
}

#[tokio::test]
async fn duplicate_customer_email_is_rejected() {
    let db = memory_db_with_schema().await;
    let sample = SeedData::sample();
    let mut twin = sample.customers[0].clone();
    twin.id = Set(99);
    let data = SeedData {
        customers: vec![sample.customers[0].clone(), twin],
        ..SeedData::default()
    };

    let err = db.seed(&data).await.expect_err("duplicate email should fail");

    assert_eq!(err.integrity_kind(), Some(IntegrityKind::UniqueViolation));
    assert!(!err.is_retryable());
    assert_eq!(row_count(&db, "customers").await, 0);
}

#[tokio::test]
async fn every_foreign_key_rejects_missing_parents() {
    let sample = SeedData::sample();
    let cases: Vec<(&str, SeedData)> = vec![
        (
            "dishes",
            SeedData {
                dishes: vec![sample.dishes[0].clone()],
                ..SeedData::default()
            },
        ),
        (
            "orders",
            SeedData {
                orders: vec![sample.orders[0].clone()],
                ..SeedData::default()
            },
        ),
        (
            "ingredients",
            SeedData {
                ingredients: vec![sample.ingredients[0].clone()],
                ..SeedData::default()
            },
        ),
        (
            "order_lines",
            SeedData {
                order_lines: vec![sample.order_lines[0].clone()],
                ..SeedData::default()
            },
        ),
        (
            "dish_ingredients",
            SeedData {
                dish_ingredients: vec![sample.dish_ingredients[0].clone()],
                ..SeedData::default()
            },
        ),
        (
            "reviews",
            SeedData {
                reviews: vec![sample.reviews[0].clone()],
                ..SeedData::default()
            },
        ),
    ];

    for (table, data) in cases {
        let db = memory_db_with_schema().await;
        let err = db.seed(&data).await.expect_err("orphan row should fail");

        match err {
            RestaurantError::Integrity { entity, kind, .. } => {
                assert_eq!(entity, table);
                assert_eq!(kind, IntegrityKind::ForeignKeyViolation, "{table}");
            }
            other => panic!("expected integrity error for {table}, got {other}"),
        }
        assert_eq!(row_count(&db, table).await, 0);
    }
}

#[tokio::test]
async fn parents_without_children_are_accepted() {
    let db = memory_db_with_schema().await;
    let sample = SeedData::sample();
    let data = SeedData {
        categories: sample.categories.clone(),
        suppliers: sample.suppliers.clone(),
        customers: sample.customers.clone(),
        ..SeedData::default()
    };

    let summary = db.seed(&data).await.expect("seed parents only");

    assert_eq!(summary.total(), 14);
    assert_eq!(summary.dishes, 0);
    assert_eq!(
        db.connection().get_database_backend(),
        sea_orm::DbBackend::Sqlite
    );
}
