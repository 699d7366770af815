//! Database-specific error types and conversions.

use faktura_core::error::FakturaError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Corrupt record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for FakturaError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FakturaError::NotFound { entity, id },
            other => FakturaError::Database(other.to_string()),
        }
    }
}

/// Translate a write failure into the business-rule error for `code`
/// when the failure is a UNIQUE-index violation — the durable uniqueness
/// guard firing after the service-level pre-check lost a race. Any other
/// failure passes through as an infrastructure error.
pub(crate) fn map_unique_violation(
    err: surrealdb::Error,
    message: &str,
    code: &str,
) -> FakturaError {
    if err.to_string().contains("already contains") {
        FakturaError::business_rule(message, code)
    } else {
        DbError::from(err).into()
    }
}
