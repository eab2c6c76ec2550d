//! External OIDC registry sync boundary.
//!
//! The registry is a secondary, eventually-consistent mirror of the
//! admin store. Every operation must be idempotent (find-or-create on
//! upsert, delete-if-present on delete) and a failure must never
//! affect store state: services call these post-commit and swallow
//! errors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DeskResult;
use crate::models::application::ApplicationFlow;

/// Snapshot of an application pushed to the external registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDescriptor {
    pub id: Uuid,
    pub client_id: String,
    pub client_secret: String,
    pub display_name: String,
    pub flow: ApplicationFlow,
    pub redirect_uris: Vec<String>,
    pub post_logout_redirect_uris: Vec<String>,
    /// Names of every effective scope (global + explicit).
    pub scope_names: Vec<String>,
}

/// Snapshot of a scope pushed to the external registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeDescriptor {
    pub id: Uuid,
    pub scope_name: String,
    pub display_name: String,
    pub description: String,
    /// Client ids of the explicitly associated applications, exposed
    /// to the registry as audience resources.
    pub resources: Vec<String>,
}

pub trait ApplicationRegistrySync: Send + Sync {
    fn upsert_application(
        &self,
        descriptor: &ApplicationDescriptor,
    ) -> impl Future<Output = DeskResult<()>> + Send;
    fn delete_application(&self, id: Uuid) -> impl Future<Output = DeskResult<()>> + Send;
}

pub trait ScopeRegistrySync: Send + Sync {
    fn upsert_scope(
        &self,
        descriptor: &ScopeDescriptor,
    ) -> impl Future<Output = DeskResult<()>> + Send;
    fn delete_scope(&self, id: Uuid) -> impl Future<Output = DeskResult<()>> + Send;
}
