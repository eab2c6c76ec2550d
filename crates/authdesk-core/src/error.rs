//! Error types for the AuthDesk system.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("A {entity} with this {field} already exists")]
    Duplicate { entity: String, field: String },

    #[error("Invalid page size: {size} (must be between 1 and 100)")]
    InvalidPageSize { size: i64 },

    #[error("Invalid cursor: {cursor}")]
    InvalidCursor { cursor: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid reference: {message}")]
    InvalidReference { message: String },

    #[error("Mutation would leave application {application_id} without any effective scope")]
    MinimumScopeViolation { application_id: Uuid },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Registry sync failed: {0}")]
    Sync(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DeskResult<T> = Result<T, DeskError>;
