//! Application state for API handlers.
//!
//! The repository and sync traits are not dyn-compatible, so the state
//! holds fully concrete service types over the WebSocket SurrealDB
//! client and the registry client enum.

use std::sync::Arc;

use authdesk_db::DbManager;
use authdesk_db::repository::{SurrealApplicationRepository, SurrealScopeRepository};
use authdesk_service::{ApplicationService, ScopeService};
use authdesk_sync::RegistryClient;
use surrealdb::engine::remote::ws::Client;

pub type Applications = ApplicationService<
    SurrealApplicationRepository<Client>,
    SurrealScopeRepository<Client>,
    RegistryClient,
>;

pub type Scopes = ScopeService<
    SurrealScopeRepository<Client>,
    SurrealApplicationRepository<Client>,
    RegistryClient,
>;

#[derive(Clone)]
pub struct AppState {
    pub applications: Arc<Applications>,
    pub scopes: Arc<Scopes>,
    /// Kept for health checks.
    pub db: DbManager,
}

impl AppState {
    pub fn new(db: DbManager, registry: RegistryClient) -> Self {
        let client = db.client().clone();
        let applications = ApplicationService::new(
            SurrealApplicationRepository::new(client.clone()),
            SurrealScopeRepository::new(client.clone()),
            registry.clone(),
        );
        let scopes = ScopeService::new(
            SurrealScopeRepository::new(client.clone()),
            SurrealApplicationRepository::new(client),
            registry,
        );
        Self {
            applications: Arc::new(applications),
            scopes: Arc::new(scopes),
            db,
        }
    }
}
