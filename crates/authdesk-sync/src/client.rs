//! Concrete registry client used by the server.
//!
//! The sync traits are not dyn-compatible, so runtime selection between
//! the HTTP and no-op adapters goes through an enum instead of a trait
//! object.

use authdesk_core::DeskResult;
use authdesk_core::sync::{
    ApplicationDescriptor, ApplicationRegistrySync, ScopeDescriptor, ScopeRegistrySync,
};
use uuid::Uuid;

use crate::http::HttpRegistrySync;
use crate::noop::NoopRegistrySync;

#[derive(Debug, Clone)]
pub enum RegistryClient {
    Noop(NoopRegistrySync),
    Http(HttpRegistrySync),
}

impl RegistryClient {
    /// HTTP sync when a base URL is configured, no-op otherwise.
    pub fn from_endpoint(base_url: Option<String>, bearer_token: Option<String>) -> Self {
        match base_url {
            Some(url) => Self::Http(HttpRegistrySync::new(url, bearer_token)),
            None => Self::Noop(NoopRegistrySync),
        }
    }
}

impl ApplicationRegistrySync for RegistryClient {
    async fn upsert_application(&self, descriptor: &ApplicationDescriptor) -> DeskResult<()> {
        match self {
            Self::Noop(inner) => inner.upsert_application(descriptor).await,
            Self::Http(inner) => inner.upsert_application(descriptor).await,
        }
    }

    async fn delete_application(&self, id: Uuid) -> DeskResult<()> {
        match self {
            Self::Noop(inner) => inner.delete_application(id).await,
            Self::Http(inner) => inner.delete_application(id).await,
        }
    }
}

impl ScopeRegistrySync for RegistryClient {
    async fn upsert_scope(&self, descriptor: &ScopeDescriptor) -> DeskResult<()> {
        match self {
            Self::Noop(inner) => inner.upsert_scope(descriptor).await,
            Self::Http(inner) => inner.upsert_scope(descriptor).await,
        }
    }

    async fn delete_scope(&self, id: Uuid) -> DeskResult<()> {
        match self {
            Self::Noop(inner) => inner.delete_scope(id).await,
            Self::Http(inner) => inner.delete_scope(id).await,
        }
    }
}
