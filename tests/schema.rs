use restaurant_db::{
    db::{SeedData, TABLES},
    test_helpers::{memory_db, memory_db_with_schema},
};

#[tokio::test]
async fn create_all_creates_every_table() {
    let db = memory_db_with_schema().await;

    let snapshot = db.snapshot().await.expect("snapshot");
    let tables: Vec<&str> = snapshot.iter().map(|t| t.table.as_str()).collect();

    assert_eq!(tables, TABLES);
}

#[tokio::test]
async fn create_all_is_idempotent_when_tables_exist() {
    let db = memory_db_with_schema().await;
    let before = db.snapshot().await.expect("snapshot");

    db.create_all().await.expect("second create should be a no-op");

    assert_eq!(db.snapshot().await.expect("snapshot"), before);
}

#[tokio::test]
async fn drop_all_removes_every_table() {
    let db = memory_db_with_schema().await;
    db.seed(&SeedData::sample()).await.expect("seed");

    db.drop_all().await.expect("drop");

    assert!(db.snapshot().await.expect("snapshot").is_empty());
}

#[tokio::test]
async fn drop_then_create_reproduces_the_schema() {
    let db = memory_db_with_schema().await;
    let original = db.snapshot().await.expect("snapshot");

    db.drop_all().await.expect("drop");
    db.create_all().await.expect("recreate");

    assert_eq!(db.snapshot().await.expect("snapshot"), original);
}

#[tokio::test]
async fn drop_all_on_an_empty_database_succeeds() {
    let db = memory_db().await;

    db.drop_all().await.expect("drop on empty database");
}

#[tokio::test]
async fn snapshot_records_constraints() {
    let db = memory_db_with_schema().await;
    let snapshot = db.snapshot().await.expect("snapshot");

    let customers = snapshot
        .iter()
        .find(|t| t.table == "customers")
        .expect("customers table");
    let ddl = customers.definition.join("\n").to_ascii_uppercase();
    assert!(ddl.contains("UNIQUE"));

    let order_lines = snapshot
        .iter()
        .find(|t| t.table == "order_lines")
        .expect("order_lines table");
    let ddl = order_lines.definition.join("\n").to_ascii_uppercase();
    assert!(ddl.contains("PRIMARY KEY"));
    assert!(ddl.contains("REFERENCES \"ORDERS\""));
    assert!(ddl.contains("REFERENCES \"DISHES\""));
}
