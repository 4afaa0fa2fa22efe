//! Error types for statistics queries.

use std::fmt;

use thiserror::Error;

/// Structured classification for database failures behind the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsDbErrorKind {
    /// Connection pool timed out waiting for a free connection.
    PoolTimeout,
    /// Connection pool is closed.
    PoolClosed,
    /// Filesystem or transport IO failure.
    Io,
    /// The database rejected the statement (missing table, bad column, ...).
    Query,
    /// Row could not be decoded into the expected shape.
    Decode,
    /// Unclassified database failure.
    Other,
}

impl StatsDbErrorKind {
    #[must_use]
    pub fn from_sqlx(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => Self::PoolTimeout,
            sqlx::Error::PoolClosed => Self::PoolClosed,
            sqlx::Error::Io(_) => Self::Io,
            sqlx::Error::Database(_) => Self::Query,
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_) => Self::Decode,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for StatsDbErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PoolTimeout => "pool_timeout",
            Self::PoolClosed => "pool_closed",
            Self::Io => "io",
            Self::Query => "query",
            Self::Decode => "decode",
            Self::Other => "other",
        };
        write!(f, "{label}")
    }
}

/// Errors raised while reading dashboard statistics.
#[derive(Debug, Clone, Error)]
pub enum StatsError {
    /// Database operation failed.
    #[error("database error ({kind}): {message}")]
    Database {
        /// Typed classification of the failure.
        kind: StatsDbErrorKind,
        /// Human-readable database error text.
        message: String,
    },

    /// The backing store could not be reached at all.
    #[error("statistics source unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StatsError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database {
            kind: StatsDbErrorKind::from_sqlx(&err),
            message: err.to_string(),
        }
    }
}

impl StatsError {
    /// Returns the typed database error kind, when this is a database error.
    #[must_use]
    pub fn database_kind(&self) -> Option<StatsDbErrorKind> {
        match self {
            Self::Database { kind, .. } => Some(*kind),
            Self::Unavailable(_) => None,
        }
    }
}
