//! Persistence failures.

/// What went wrong talking to SQLite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// Opening the database or checking out a pooled connection failed
    #[display("Database connection error: {}", _0)]
    Connection(String),
    /// A statement failed
    #[display("Database query error: {}", _0)]
    Query(String),
    /// A JSON column could not be encoded or decoded
    #[display("Column serialization error: {}", _0)]
    Serialization(String),
    /// Embedded migrations could not be applied
    #[display("Migration error: {}", _0)]
    Migration(String),
    /// A lookup expected exactly one row and found none
    #[display("Record not found")]
    NotFound,
    /// The blocking task running the statements panicked or was cancelled
    #[display("Database task failed: {}", _0)]
    Task(String),
}

kind_error!(
    /// A persistence failure.
    ///
    /// ```
    /// use folio_error::{DatabaseError, DatabaseErrorKind};
    ///
    /// let err = DatabaseError::new(DatabaseErrorKind::NotFound);
    /// assert!(format!("{}", err).contains("not found"));
    /// ```
    DatabaseError(DatabaseErrorKind),
    "Database Error"
);

impl From<diesel::result::Error> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        let kind = match err {
            diesel::result::Error::NotFound => DatabaseErrorKind::NotFound,
            other => DatabaseErrorKind::Query(other.to_string()),
        };
        DatabaseError::new(kind)
    }
}

impl From<diesel::ConnectionError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Connection(err.to_string()))
    }
}

impl From<diesel::r2d2::PoolError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::r2d2::PoolError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Connection(err.to_string()))
    }
}

impl From<serde_json::Error> for DatabaseError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::new(DatabaseErrorKind::Serialization(err.to_string()))
    }
}
