//! Wire DTOs and request types.
//!
//! DTOs flatten the association edge into reference lists: an
//! Application carries its *effective* scopes (globals merged in), a
//! Scope carries only its explicit applications. Wire casing is
//! camelCase.

use authdesk_core::models::application::ApplicationFlow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeReference {
    pub id: Uuid,
    pub display_name: String,
    pub scope_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReference {
    pub id: Uuid,
    pub display_name: String,
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDto {
    pub id: Uuid,
    pub display_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub flow: ApplicationFlow,
    pub post_logout_redirect_uris: Option<String>,
    pub redirect_uris: Option<String>,
    /// Effective scopes: every global scope plus explicit grants.
    pub scopes: Vec<ScopeReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeDto {
    pub id: Uuid,
    pub display_name: String,
    pub scope_name: String,
    pub description: String,
    /// Explicit associations only; empty for a global scope.
    pub applications: Vec<ApplicationReference>,
}

/// One page of a cursor-ordered listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    /// Opaque token resuming after the last returned item; absent on
    /// the final page.
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub display_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub flow: ApplicationFlow,
    pub post_logout_redirect_uris: Option<String>,
    pub redirect_uris: Option<String>,
    pub scope_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    pub display_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub flow: ApplicationFlow,
    pub post_logout_redirect_uris: Option<String>,
    pub redirect_uris: Option<String>,
    pub scope_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScopeRequest {
    pub display_name: String,
    pub scope_name: String,
    pub description: String,
    /// Absent or empty creates a global scope.
    pub application_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScopeRequest {
    pub display_name: String,
    pub scope_name: String,
    pub description: String,
    pub application_ids: Option<Vec<Uuid>>,
}
