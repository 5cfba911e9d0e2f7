use std::fmt;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type RestaurantResult<T> = Result<T, RestaurantError>;

/// Broad failure category, used by callers that only need to decide whether
/// to retry or abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connectivity,
    Schema,
    Integrity,
    Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityKind {
    UniqueViolation,
    ForeignKeyViolation,
    Other,
}

impl fmt::Display for IntegrityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IntegrityKind::UniqueViolation => "unique constraint violation",
            IntegrityKind::ForeignKeyViolation => "foreign key violation",
            IntegrityKind::Other => "constraint violation",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum RestaurantError {
    #[error("database unreachable ({context}): {source}")]
    Connectivity {
        context: String,
        #[source]
        source: DbErr,
    },
    #[error("no reachable database endpoint (tried: {})", tried.join(", "))]
    NoReachableEndpoint { tried: Vec<String> },
    #[error("unsupported database url '{url}'; expected postgres://, postgresql://, or sqlite:")]
    UnsupportedUrl { url: String },
    #[error("schema operation failed on {object}: {source}")]
    Schema {
        object: String,
        #[source]
        source: DbErr,
    },
    #[error("invalid database name '{name}'")]
    InvalidDatabaseName { name: String },
    #[error("{kind} while inserting {entity}: {source}")]
    Integrity {
        entity: &'static str,
        kind: IntegrityKind,
        #[source]
        source: DbErr,
    },
    #[error("report '{report}' failed: {source}")]
    Query {
        report: &'static str,
        #[source]
        source: DbErr,
    },
}

impl RestaurantError {
    pub fn schema(object: impl Into<String>, err: DbErr) -> Self {
        let object = object.into();
        if is_connectivity(&err) {
            return Self::Connectivity {
                context: object,
                source: err,
            };
        }
        Self::Schema {
            object,
            source: err,
        }
    }

    pub fn insert(entity: &'static str, err: DbErr) -> Self {
        if is_connectivity(&err) {
            return Self::Connectivity {
                context: format!("inserting {entity}"),
                source: err,
            };
        }
        let kind = match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => IntegrityKind::UniqueViolation,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => IntegrityKind::ForeignKeyViolation,
            _ => IntegrityKind::Other,
        };
        Self::Integrity {
            entity,
            kind,
            source: err,
        }
    }

    pub fn query(report: &'static str, err: DbErr) -> Self {
        if is_connectivity(&err) {
            return Self::Connectivity {
                context: format!("report {report}"),
                source: err,
            };
        }
        Self::Query {
            report,
            source: err,
        }
    }

    pub fn connectivity(context: impl Into<String>, err: DbErr) -> Self {
        Self::Connectivity {
            context: context.into(),
            source: err,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Connectivity { .. } | Self::NoReachableEndpoint { .. } | Self::UnsupportedUrl { .. } => {
                ErrorCategory::Connectivity
            }
            Self::Schema { .. } | Self::InvalidDatabaseName { .. } => ErrorCategory::Schema,
            Self::Integrity { .. } => ErrorCategory::Integrity,
            Self::Query { .. } => ErrorCategory::Query,
        }
    }

    /// Only a lost or refused connection is worth trying again; a bad url is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connectivity { .. } | Self::NoReachableEndpoint { .. }
        )
    }

    pub fn integrity_kind(&self) -> Option<IntegrityKind> {
        match self {
            Self::Integrity { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub(crate) fn is_connectivity(err: &DbErr) -> bool {
    matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
}
