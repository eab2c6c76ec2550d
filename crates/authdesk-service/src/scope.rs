//! Scope service: uniqueness and referential validation, the
//! minimum-coverage gate, and projection for permission scopes.

use std::collections::HashMap;

use authdesk_core::models::application::Application;
use authdesk_core::models::scope::{CreateScope, Scope, UpdateScope};
use authdesk_core::repository::{ApplicationRepository, ScopeRepository};
use authdesk_core::sync::{ScopeDescriptor, ScopeRegistrySync};
use authdesk_core::{DeskError, DeskResult};
use tracing::warn;
use uuid::Uuid;

use crate::coverage;
use crate::dto::{
    ApplicationReference, CreateScopeRequest, CursorPage, ScopeDto, UpdateScopeRequest,
};
use crate::page::{self, PageRequest};

pub struct ScopeService<S, A, Y> {
    scopes: S,
    applications: A,
    registry: Y,
}

impl<S, A, Y> ScopeService<S, A, Y>
where
    S: ScopeRepository,
    A: ApplicationRepository,
    Y: ScopeRegistrySync,
{
    pub fn new(scopes: S, applications: A, registry: Y) -> Self {
        Self {
            scopes,
            applications,
            registry,
        }
    }

    pub async fn get_page(
        &self,
        cursor: Option<&str>,
        page_size: i64,
    ) -> DeskResult<CursorPage<ScopeDto>> {
        let request = PageRequest::parse(cursor, page_size)?;
        let rows = self
            .scopes
            .list_after(request.after, request.probe_limit())
            .await?;
        let (rows, next_cursor) = page::clip(rows, request.size, |scope| scope.id);

        let mut app_ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|scope| scope.application_ids.iter().copied())
            .collect();
        app_ids.sort_unstable();
        app_ids.dedup();
        let apps = self.applications.get_by_ids(&app_ids).await?;
        let by_id: HashMap<Uuid, &Application> = apps.iter().map(|a| (a.id, a)).collect();

        let items = rows
            .into_iter()
            .map(|scope| project(&scope, |id| by_id.get(&id).copied()))
            .collect();
        Ok(CursorPage { items, next_cursor })
    }

    pub async fn get_by_id(&self, id: Uuid) -> DeskResult<ScopeDto> {
        let scope = self.scopes.get_by_id(id).await?;
        self.project_one(&scope).await
    }

    pub async fn create(&self, request: CreateScopeRequest) -> DeskResult<ScopeDto> {
        match self.scopes.get_by_scope_name(&request.scope_name).await {
            Ok(_) => {
                return Err(DeskError::Duplicate {
                    entity: "scope".into(),
                    field: "scope_name".into(),
                });
            }
            Err(DeskError::NotFound { .. }) => {}
            Err(err) => return Err(err),
        }
        let application_ids = self.resolve_assignments(request.application_ids).await?;
        // A create can only add coverage, but the gate runs uniformly
        // on every mutation path.
        self.check_coverage(None, Some(&application_ids)).await?;

        let scope = self
            .scopes
            .create(CreateScope {
                display_name: request.display_name,
                scope_name: request.scope_name,
                description: request.description,
                application_ids,
            })
            .await?;

        let dto = self.project_one(&scope).await?;
        self.mirror_upsert(&dto).await;
        Ok(dto)
    }

    pub async fn update(&self, id: Uuid, request: UpdateScopeRequest) -> DeskResult<ScopeDto> {
        match self.scopes.get_by_scope_name(&request.scope_name).await {
            Ok(existing) if existing.id != id => {
                return Err(DeskError::Duplicate {
                    entity: "scope".into(),
                    field: "scope_name".into(),
                });
            }
            Ok(_) => {}
            Err(DeskError::NotFound { .. }) => {}
            Err(err) => return Err(err),
        }
        let current = self.scopes.get_by_id(id).await?;
        let application_ids = self.resolve_assignments(request.application_ids).await?;
        self.check_coverage(Some(&current), Some(&application_ids))
            .await?;

        let scope = self
            .scopes
            .update(
                id,
                UpdateScope {
                    display_name: request.display_name,
                    scope_name: request.scope_name,
                    description: request.description,
                    application_ids,
                },
            )
            .await?;

        let dto = self.project_one(&scope).await?;
        self.mirror_upsert(&dto).await;
        Ok(dto)
    }

    pub async fn delete(&self, id: Uuid) -> DeskResult<()> {
        let current = self.scopes.get_by_id(id).await?;
        self.check_coverage(Some(&current), None).await?;
        self.scopes.delete(id).await?;
        if let Err(err) = self.registry.delete_scope(id).await {
            warn!(scope_id = %id, error = %err, "registry delete failed after commit");
        }
        Ok(())
    }

    /// Deduplicates the requested assignment set and verifies every id
    /// names an existing application. An empty set is a global scope.
    async fn resolve_assignments(&self, ids: Option<Vec<Uuid>>) -> DeskResult<Vec<Uuid>> {
        let ids = coverage::dedup_ids(ids);
        if !ids.is_empty() {
            let existing = self.applications.count_existing(&ids).await?;
            if existing != ids.len() as u64 {
                return Err(DeskError::InvalidReference {
                    message: "One or more application ids do not exist".into(),
                });
            }
        }
        Ok(ids)
    }

    async fn check_coverage(
        &self,
        current: Option<&Scope>,
        proposed: Option<&[Uuid]>,
    ) -> DeskResult<()> {
        let application_ids = self.applications.list_ids().await?;
        let scopes = self.scopes.list_all().await?;
        coverage::check_minimum_coverage(&application_ids, &scopes, current, proposed)
    }

    async fn project_one(&self, scope: &Scope) -> DeskResult<ScopeDto> {
        let apps = self.applications.get_by_ids(&scope.application_ids).await?;
        let by_id: HashMap<Uuid, &Application> = apps.iter().map(|a| (a.id, a)).collect();
        Ok(project(scope, |id| by_id.get(&id).copied()))
    }

    async fn mirror_upsert(&self, dto: &ScopeDto) {
        let descriptor = ScopeDescriptor {
            id: dto.id,
            scope_name: dto.scope_name.clone(),
            display_name: dto.display_name.clone(),
            description: dto.description.clone(),
            resources: dto
                .applications
                .iter()
                .map(|app| app.client_id.clone())
                .collect(),
        };
        if let Err(err) = self.registry.upsert_scope(&descriptor).await {
            warn!(scope_id = %dto.id, error = %err, "registry upsert failed after commit");
        }
    }
}

/// Applications listed in stored association order.
fn project<'a>(scope: &Scope, lookup: impl Fn(Uuid) -> Option<&'a Application>) -> ScopeDto {
    let applications = scope
        .application_ids
        .iter()
        .filter_map(|id| lookup(*id))
        .map(|app| ApplicationReference {
            id: app.id,
            display_name: app.display_name.clone(),
            client_id: app.client_id.clone(),
        })
        .collect();
    ScopeDto {
        id: scope.id,
        display_name: scope.display_name.clone(),
        scope_name: scope.scope_name.clone(),
        description: scope.description.clone(),
        applications,
    }
}
