use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use tracing::debug;

use crate::{
    config::{DatabaseConfig, Endpoint},
    error::{RestaurantError, RestaurantResult},
};

use super::providers::{DbProvider, PostgresDbProvider};

const MAINTENANCE_DATABASE: &str = "postgres";

#[derive(Debug, FromQueryResult)]
struct DatabaseRow {
    #[allow(dead_code)]
    datname: String,
}

/// Splits a PostgreSQL url into the url of the maintenance database on the
/// same server and the name of the target database.
pub fn split_database_url(url: &str) -> Option<(String, String)> {
    let (without_query, query) = match url.split_once('?') {
        Some((head, query)) => (head, Some(query)),
        None => (url, None),
    };
    let (_, after_scheme) = without_query.split_once("://")?;
    if !after_scheme.contains('/') {
        return None;
    }
    let (base, name) = without_query.rsplit_once('/')?;
    if name.is_empty() {
        return None;
    }

    let mut maintenance = format!("{base}/{MAINTENANCE_DATABASE}");
    if let Some(query) = query {
        maintenance.push('?');
        maintenance.push_str(query);
    }
    Some((maintenance, name.to_string()))
}

fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Creates the target database when it does not exist yet.
/// Returns `true` when the database was created by this call.
pub async fn ensure_database(endpoint: &Endpoint, cfg: &DatabaseConfig) -> RestaurantResult<bool> {
    let Some((maintenance_url, name)) = split_database_url(&endpoint.url) else {
        return Err(RestaurantError::InvalidDatabaseName {
            name: endpoint.redacted_url(),
        });
    };
    if !is_plain_identifier(&name) {
        return Err(RestaurantError::InvalidDatabaseName { name });
    }

    let maintenance = Endpoint::new(endpoint.label.clone(), maintenance_url);
    let admin = PostgresDbProvider
        .connect(&maintenance, cfg)
        .await
        .map_err(|err| RestaurantError::connectivity(maintenance.to_string(), err))?;

    let outcome = create_if_missing(&admin, &name).await;
    close_then(admin, outcome).await
}

async fn create_if_missing(admin: &DatabaseConnection, name: &str) -> RestaurantResult<bool> {
    let exists = DatabaseRow::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT datname::text AS datname FROM pg_database WHERE datname = $1",
        [name.into()],
    ))
    .one(admin)
    .await
    .map_err(|err| RestaurantError::schema(format!("database {name}"), err))?
    .is_some();

    if exists {
        debug!(database = %name, "database already exists");
        return Ok(false);
    }
    admin
        .execute_unprepared(&format!("CREATE DATABASE \"{name}\""))
        .await
        .map_err(|err| RestaurantError::schema(format!("database {name}"), err))?;
    Ok(true)
}

/// Closes the maintenance pool whatever the outcome, then hands the outcome back.
async fn close_then<T>(admin: DatabaseConnection, outcome: RestaurantResult<T>) -> RestaurantResult<T> {
    if let Err(err) = admin.close().await {
        debug!(error = %err, "failed to close maintenance connection");
    }
    outcome
}
