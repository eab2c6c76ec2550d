//! HTTP adapter for an external OIDC registry.
//!
//! The registry exposes idempotent PUT/DELETE endpoints, so every call
//! here is safe to repeat. Applications are keyed by client id and
//! scopes by scope name on upsert; deletes go by the admin-side record
//! id, which the registry stores alongside each mirrored entry.

use authdesk_core::sync::{
    ApplicationDescriptor, ApplicationRegistrySync, ScopeDescriptor, ScopeRegistrySync,
};
use authdesk_core::{DeskError, DeskResult};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct HttpRegistrySync {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpRegistrySync {
    pub fn new(base_url: impl Into<String>, bearer_token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            bearer_token,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> DeskResult<()> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| DeskError::Sync(err.to_string()))?;
        response
            .error_for_status()
            .map_err(|err| DeskError::Sync(err.to_string()))?;
        Ok(())
    }
}

impl ApplicationRegistrySync for HttpRegistrySync {
    async fn upsert_application(&self, descriptor: &ApplicationDescriptor) -> DeskResult<()> {
        let url = format!("{}/applications/{}", self.base_url, descriptor.client_id);
        self.send(self.client.put(url).json(descriptor)).await
    }

    async fn delete_application(&self, id: Uuid) -> DeskResult<()> {
        let url = format!("{}/applications/{id}", self.base_url);
        self.send(self.client.delete(url)).await
    }
}

impl ScopeRegistrySync for HttpRegistrySync {
    async fn upsert_scope(&self, descriptor: &ScopeDescriptor) -> DeskResult<()> {
        let url = format!("{}/scopes/{}", self.base_url, descriptor.scope_name);
        self.send(self.client.put(url).json(descriptor)).await
    }

    async fn delete_scope(&self, id: Uuid) -> DeskResult<()> {
        let url = format!("{}/scopes/{id}", self.base_url);
        self.send(self.client.delete(url)).await
    }
}
