//! Scope (permission unit) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named permission unit that client applications can be granted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    pub id: Uuid,
    pub display_name: String,
    /// Globally unique, external-facing permission identifier.
    pub scope_name: String,
    pub description: String,
    /// Applications explicitly associated with this scope. Empty means
    /// the scope is global.
    pub application_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Scope {
    /// A scope with no explicit associations is implicitly granted to
    /// every application. Derived, never stored, so it cannot drift
    /// from the association set.
    pub fn is_global(&self) -> bool {
        self.application_ids.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CreateScope {
    pub display_name: String,
    pub scope_name: String,
    pub description: String,
    /// Empty set creates a global scope.
    pub application_ids: Vec<Uuid>,
}

/// Full-replace update input. Can flip a scope between global and
/// explicitly scoped by changing the association set.
#[derive(Debug, Clone)]
pub struct UpdateScope {
    pub display_name: String,
    pub scope_name: String,
    pub description: String,
    pub application_ids: Vec<Uuid>,
}
