use std::collections::BTreeMap;

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    Schema, Statement,
    sea_query::{Table, TableCreateStatement, TableDropStatement},
};
use serde::Serialize;
use tracing::{error, info};

use super::entities::prelude::{
    Category, Customer, Dish, DishIngredient, Ingredient, Order, OrderLine, Review, Supplier,
};
use crate::error::{RestaurantError, RestaurantResult};

/// Table names in creation order; parents always precede their dependents.
pub const TABLES: [&str; 9] = [
    "categories",
    "suppliers",
    "dishes",
    "customers",
    "orders",
    "ingredients",
    "order_lines",
    "dish_ingredients",
    "reviews",
];

struct TableStatements {
    name: &'static str,
    create: TableCreateStatement,
    drop: TableDropStatement,
}

fn table<E>(schema: &Schema, backend: DbBackend, name: &'static str, entity: E) -> TableStatements
where
    E: EntityTrait,
{
    let mut create = schema.create_table_from_entity(entity);
    create.if_not_exists();

    let mut drop = Table::drop();
    drop.table(entity.table_ref()).if_exists();
    if backend == DbBackend::Postgres {
        drop.cascade();
    }

    TableStatements { name, create, drop }
}

fn table_statements(backend: DbBackend) -> Vec<TableStatements> {
    let schema = Schema::new(backend);
    vec![
        table(&schema, backend, TABLES[0], Category),
        table(&schema, backend, TABLES[1], Supplier),
        table(&schema, backend, TABLES[2], Dish),
        table(&schema, backend, TABLES[3], Customer),
        table(&schema, backend, TABLES[4], Order),
        table(&schema, backend, TABLES[5], Ingredient),
        table(&schema, backend, TABLES[6], OrderLine),
        table(&schema, backend, TABLES[7], DishIngredient),
        table(&schema, backend, TABLES[8], Review),
    ]
}

/// Creates every table that does not exist yet, parents first.
pub async fn create_all(db: &DatabaseConnection) -> RestaurantResult<()> {
    let backend = db.get_database_backend();
    for statements in table_statements(backend) {
        let sql = backend.build(&statements.create).sql;
        if let Err(err) = db.execute_unprepared(&sql).await {
            let err = RestaurantError::schema(statements.name, err);
            error!(table = statements.name, error = %err, "failed to create table");
            return Err(err);
        }
    }
    info!(tables = TABLES.len(), "schema created");
    Ok(())
}

/// Drops every table, dependents first.
pub async fn drop_all(db: &DatabaseConnection) -> RestaurantResult<()> {
    let backend = db.get_database_backend();
    for statements in table_statements(backend).into_iter().rev() {
        let sql = backend.build(&statements.drop).sql;
        if let Err(err) = db.execute_unprepared(&sql).await {
            let err = RestaurantError::schema(statements.name, err);
            error!(table = statements.name, error = %err, "failed to drop table");
            return Err(err);
        }
    }
    info!(tables = TABLES.len(), "schema dropped");
    Ok(())
}

/// Definition of one table as reported by the engine's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub table: String,
    pub definition: Vec<String>,
}

#[derive(Debug, FromQueryResult)]
struct CatalogRow {
    table_name: String,
    entry: String,
}

const SQLITE_CATALOG: &str = "SELECT tbl_name AS table_name, sql AS entry \
     FROM sqlite_master WHERE type = 'table' AND sql IS NOT NULL \
     ORDER BY tbl_name";

const POSTGRES_COLUMNS: &str = "SELECT c.table_name::text AS table_name, \
     ('column ' || c.column_name || ' ' || c.data_type \
       || COALESCE('(' || c.character_maximum_length || ')', '') \
       || CASE WHEN c.data_type = 'numeric' \
            THEN '(' || c.numeric_precision || ',' || c.numeric_scale || ')' ELSE '' END \
       || CASE WHEN c.is_nullable = 'NO' THEN ' not null' ELSE '' END \
       || COALESCE(' default ' || c.column_default, ''))::text AS entry \
     FROM information_schema.columns c \
     WHERE c.table_schema = current_schema() \
     ORDER BY c.table_name, c.ordinal_position";

const POSTGRES_CONSTRAINTS: &str = "SELECT tc.table_name::text AS table_name, \
     (lower(tc.constraint_type) || ' ' \
       || string_agg(kcu.column_name::text, ',' ORDER BY kcu.ordinal_position))::text AS entry \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON tc.constraint_name = kcu.constraint_name \
      AND tc.table_schema = kcu.table_schema \
      AND tc.table_name = kcu.table_name \
     WHERE tc.table_schema = current_schema() \
     GROUP BY tc.table_name, tc.constraint_name, tc.constraint_type \
     ORDER BY 1, 2";

/// Reads the current definition of every known table, in creation order.
/// Tables that do not exist are omitted.
pub async fn snapshot(db: &DatabaseConnection) -> RestaurantResult<Vec<TableSnapshot>> {
    let backend = db.get_database_backend();
    let queries: &[&str] = match backend {
        DbBackend::Postgres => &[POSTGRES_COLUMNS, POSTGRES_CONSTRAINTS],
        _ => &[SQLITE_CATALOG],
    };

    let mut by_table: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for sql in queries {
        let rows = CatalogRow::find_by_statement(Statement::from_string(backend, *sql))
            .all(db)
            .await
            .map_err(|err| {
                let err = RestaurantError::schema("catalog", err);
                error!(error = %err, "failed to read schema catalog");
                err
            })?;
        for row in rows {
            by_table.entry(row.table_name).or_default().push(row.entry);
        }
    }

    Ok(TABLES
        .iter()
        .filter_map(|name| {
            by_table.remove(*name).map(|definition| TableSnapshot {
                table: name.to_string(),
                definition,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use sea_orm::DbBackend;

    use super::{TABLES, table_statements};

    #[test]
    fn statements_follow_table_order() {
        let names: Vec<&str> = table_statements(DbBackend::Sqlite)
            .iter()
            .map(|statements| statements.name)
            .collect();

        assert_eq!(names, TABLES);
    }

    #[test]
    fn postgres_creates_fixed_point_and_foreign_keys() {
        let backend = DbBackend::Postgres;
        let statements = table_statements(backend);
        let dishes = backend.build(&statements[2].create).sql;
        let order_lines = backend.build(&statements[6].create).sql;
        let drop = backend.build(&statements[0].drop).sql;

        assert!(dishes.contains("CREATE TABLE IF NOT EXISTS \"dishes\""));
        assert!(dishes.contains("decimal(10, 2)"));
        assert!(dishes.contains("REFERENCES \"categories\""));
        assert!(order_lines.contains("PRIMARY KEY"));
        assert!(drop.contains("CASCADE"));
    }
}
