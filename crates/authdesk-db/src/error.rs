//! Database-specific error types and conversions.

use authdesk_core::error::DeskError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for DeskError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => DeskError::NotFound { entity, id },
            other => DeskError::Database(other.to_string()),
        }
    }
}
