//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups for a single entity
//! fail with [`DeskError::NotFound`] rather than returning an option;
//! callers that treat absence as a normal outcome match on the error.

use uuid::Uuid;

use crate::error::DeskResult;
use crate::models::{
    application::{Application, CreateApplication, UpdateApplication},
    scope::{CreateScope, Scope, UpdateScope},
};

pub trait ApplicationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateApplication,
    ) -> impl Future<Output = DeskResult<Application>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = DeskResult<Application>> + Send;
    fn get_by_client_id(
        &self,
        client_id: &str,
    ) -> impl Future<Output = DeskResult<Application>> + Send;
    /// Fetch several applications at once; unknown ids are silently
    /// skipped (callers compare counts when absence matters).
    fn get_by_ids(&self, ids: &[Uuid]) -> impl Future<Output = DeskResult<Vec<Application>>> + Send;
    /// Full replace of fields and association edges.
    fn update(
        &self,
        id: Uuid,
        input: UpdateApplication,
    ) -> impl Future<Output = DeskResult<Application>> + Send;
    /// Removes the application and its association edges.
    fn delete(&self, id: Uuid) -> impl Future<Output = DeskResult<()>> + Send;
    /// Page of applications ordered by id ascending, strictly after
    /// `after` when present.
    fn list_after(
        &self,
        after: Option<Uuid>,
        limit: u32,
    ) -> impl Future<Output = DeskResult<Vec<Application>>> + Send;
    /// Ids of every application in the store.
    fn list_ids(&self) -> impl Future<Output = DeskResult<Vec<Uuid>>> + Send;
    /// How many of the given ids exist.
    fn count_existing(&self, ids: &[Uuid]) -> impl Future<Output = DeskResult<u64>> + Send;
}

pub trait ScopeRepository: Send + Sync {
    fn create(&self, input: CreateScope) -> impl Future<Output = DeskResult<Scope>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = DeskResult<Scope>> + Send;
    fn get_by_scope_name(&self, scope_name: &str)
    -> impl Future<Output = DeskResult<Scope>> + Send;
    fn get_by_ids(&self, ids: &[Uuid]) -> impl Future<Output = DeskResult<Vec<Scope>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateScope,
    ) -> impl Future<Output = DeskResult<Scope>> + Send;
    /// Removes the scope and its association edges.
    fn delete(&self, id: Uuid) -> impl Future<Output = DeskResult<()>> + Send;
    fn list_after(
        &self,
        after: Option<Uuid>,
        limit: u32,
    ) -> impl Future<Output = DeskResult<Vec<Scope>>> + Send;
    /// Every scope with its association set, for coverage simulation
    /// and effective-scope projection.
    fn list_all(&self) -> impl Future<Output = DeskResult<Vec<Scope>>> + Send;
}
