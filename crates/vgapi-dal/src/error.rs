pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid order by field: {0}")]
    InvalidOrderByField(String),

    #[error("Invalid filter field: {0}")]
    InvalidFilterField(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("{entity} {id} is referenced by {dependants} record(s)")]
    Restricted {
        entity: String,
        id: i64,
        dependants: i64,
    },
}

impl Error {
    /// Foreign key violations are reported as invalid references, everything else as database error
    pub(crate) fn from_write(err: sqlx::Error, reference: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                Error::InvalidReference(reference.to_string())
            }
            err => Error::DatabaseError(err),
        }
    }
}
