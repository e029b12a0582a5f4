//! Classification of Diesel failures shared by every repository.
//!
//! Each adapter turns a [`DatabaseFailure`] into its own port error, so the
//! constraint names from `backend/migrations` are matched in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use super::pool::PoolError;

pub(crate) const COMMENTS_PLACE_FK: &str = "comments_place_id_fkey";
pub(crate) const COMMENTS_USER_FK: &str = "comments_user_id_fkey";
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";

/// What went wrong, reduced to the cases adapters distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DatabaseFailure {
    Connection(String),
    Query(String),
    ForeignKey { constraint: Option<String> },
    Unique { constraint: Option<String> },
}

impl DatabaseFailure {
    pub(crate) fn from_pool(error: PoolError) -> Self {
        Self::Connection(error.into_message())
    }

    /// Whether the failure names the given constraint.
    pub(crate) fn names(&self, expected: &str) -> bool {
        match self {
            Self::ForeignKey { constraint } | Self::Unique { constraint } => {
                constraint.as_deref() == Some(expected)
            }
            _ => false,
        }
    }

    /// Collapse into a connection or query message for ports without
    /// constraint-specific variants.
    pub(crate) fn into_basic<E>(
        self,
        connection: impl FnOnce(String) -> E,
        query: impl FnOnce(String) -> E,
    ) -> E {
        match self {
            Self::Connection(message) => connection(message),
            Self::Query(message) => query(message),
            Self::ForeignKey { constraint } => {
                warn!(?constraint, "unexpected foreign key violation");
                query("foreign key violation".to_owned())
            }
            Self::Unique { constraint } => {
                warn!(?constraint, "unexpected unique violation");
                query("unique violation".to_owned())
            }
        }
    }
}

/// Classify a Diesel error, logging the driver detail at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DatabaseFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DatabaseFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            DatabaseFailure::Query("database query error".to_owned())
        }
        DieselError::DeserializationError(err) => {
            DatabaseFailure::Query(format!("row decoding failed: {err}"))
        }
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::ForeignKeyViolation => DatabaseFailure::ForeignKey {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::UniqueViolation => DatabaseFailure::Unique {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ClosedConnection => {
                DatabaseFailure::Connection("database connection error".to_owned())
            }
            _ => DatabaseFailure::Query("database error".to_owned()),
        },
        _ => DatabaseFailure::Query("database error".to_owned()),
    }
}
