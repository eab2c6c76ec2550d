//! Registry sync that does nothing.

use authdesk_core::DeskResult;
use authdesk_core::sync::{
    ApplicationDescriptor, ApplicationRegistrySync, ScopeDescriptor, ScopeRegistrySync,
};
use tracing::debug;
use uuid::Uuid;

/// Used when no registry endpoint is configured; every call succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRegistrySync;

impl ApplicationRegistrySync for NoopRegistrySync {
    async fn upsert_application(&self, descriptor: &ApplicationDescriptor) -> DeskResult<()> {
        debug!(client_id = %descriptor.client_id, "registry sync disabled, skipping upsert");
        Ok(())
    }

    async fn delete_application(&self, id: Uuid) -> DeskResult<()> {
        debug!(application_id = %id, "registry sync disabled, skipping delete");
        Ok(())
    }
}

impl ScopeRegistrySync for NoopRegistrySync {
    async fn upsert_scope(&self, descriptor: &ScopeDescriptor) -> DeskResult<()> {
        debug!(scope_name = %descriptor.scope_name, "registry sync disabled, skipping upsert");
        Ok(())
    }

    async fn delete_scope(&self, id: Uuid) -> DeskResult<()> {
        debug!(scope_id = %id, "registry sync disabled, skipping delete");
        Ok(())
    }
}
