//! Application (OAuth client) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grant flow an application is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationFlow {
    ClientCredentials,
    AuthorizationWithPkce,
}

/// A registered OAuth/OIDC client application.
///
/// `scope_ids` holds the *explicit* scope associations only. Global
/// scopes (those with no explicit associations anywhere) are granted
/// implicitly and never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub display_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub flow: ApplicationFlow,
    /// Comma-separated redirect URIs. Only valid under
    /// [`ApplicationFlow::AuthorizationWithPkce`].
    pub redirect_uris: Option<String>,
    /// Comma-separated post-logout redirect URIs. Same flow rule.
    pub post_logout_redirect_uris: Option<String>,
    pub scope_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateApplication {
    pub display_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub flow: ApplicationFlow,
    pub redirect_uris: Option<String>,
    pub post_logout_redirect_uris: Option<String>,
    /// Explicit associations to store. Callers filter out global
    /// scopes before persisting.
    pub scope_ids: Vec<Uuid>,
}

/// Full-replace update input. All fields and the association set are
/// overwritten wholesale.
#[derive(Debug, Clone)]
pub struct UpdateApplication {
    pub display_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub flow: ApplicationFlow,
    pub redirect_uris: Option<String>,
    pub post_logout_redirect_uris: Option<String>,
    pub scope_ids: Vec<Uuid>,
}
