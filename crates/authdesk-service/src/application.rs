//! Application service: validation, orchestration, and projection for
//! OAuth client applications.

use std::collections::HashMap;

use authdesk_core::models::application::{
    Application, ApplicationFlow, CreateApplication, UpdateApplication,
};
use authdesk_core::models::scope::Scope;
use authdesk_core::repository::{ApplicationRepository, ScopeRepository};
use authdesk_core::sync::{ApplicationDescriptor, ApplicationRegistrySync};
use authdesk_core::{DeskError, DeskResult};
use tracing::warn;
use uuid::Uuid;

use crate::coverage;
use crate::dto::{
    ApplicationDto, CreateApplicationRequest, CursorPage, ScopeReference, UpdateApplicationRequest,
};
use crate::page::{self, PageRequest};

pub struct ApplicationService<A, S, Y> {
    applications: A,
    scopes: S,
    registry: Y,
}

impl<A, S, Y> ApplicationService<A, S, Y>
where
    A: ApplicationRepository,
    S: ScopeRepository,
    Y: ApplicationRegistrySync,
{
    pub fn new(applications: A, scopes: S, registry: Y) -> Self {
        Self {
            applications,
            scopes,
            registry,
        }
    }

    pub async fn get_page(
        &self,
        cursor: Option<&str>,
        page_size: i64,
    ) -> DeskResult<CursorPage<ApplicationDto>> {
        let request = PageRequest::parse(cursor, page_size)?;
        let rows = self
            .applications
            .list_after(request.after, request.probe_limit())
            .await?;
        let (rows, next_cursor) = page::clip(rows, request.size, |app| app.id);

        let globals = self.global_scopes().await?;
        // One batched lookup for every explicit scope on the page.
        let mut explicit_ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|app| app.scope_ids.iter().copied())
            .collect();
        explicit_ids.sort_unstable();
        explicit_ids.dedup();
        let explicit = self.scopes.get_by_ids(&explicit_ids).await?;
        let by_id: HashMap<Uuid, &Scope> = explicit.iter().map(|s| (s.id, s)).collect();

        let items = rows
            .into_iter()
            .map(|app| project(&app, &globals, |id| by_id.get(&id).copied()))
            .collect();
        Ok(CursorPage { items, next_cursor })
    }

    pub async fn get_by_id(&self, id: Uuid) -> DeskResult<ApplicationDto> {
        let app = self.applications.get_by_id(id).await?;
        self.project_one(&app).await
    }

    pub async fn create(&self, request: CreateApplicationRequest) -> DeskResult<ApplicationDto> {
        match self.applications.get_by_client_id(&request.client_id).await {
            Ok(_) => {
                return Err(DeskError::Duplicate {
                    entity: "application".into(),
                    field: "client_id".into(),
                });
            }
            Err(DeskError::NotFound { .. }) => {}
            Err(err) => return Err(err),
        }
        validate_redirect_uris(
            request.flow,
            request.redirect_uris.as_deref(),
            request.post_logout_redirect_uris.as_deref(),
        )?;
        let selected = self.resolve_scope_selection(request.scope_ids).await?;

        let app = self
            .applications
            .create(CreateApplication {
                display_name: request.display_name,
                client_id: request.client_id,
                client_secret: request.client_secret,
                flow: request.flow,
                redirect_uris: request.redirect_uris,
                post_logout_redirect_uris: request.post_logout_redirect_uris,
                scope_ids: explicit_ids(&selected),
            })
            .await?;

        let dto = self.project_one(&app).await?;
        self.mirror_upsert(&dto).await;
        Ok(dto)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateApplicationRequest,
    ) -> DeskResult<ApplicationDto> {
        match self.applications.get_by_client_id(&request.client_id).await {
            Ok(existing) if existing.id != id => {
                return Err(DeskError::Duplicate {
                    entity: "application".into(),
                    field: "client_id".into(),
                });
            }
            Ok(_) => {}
            Err(DeskError::NotFound { .. }) => {}
            Err(err) => return Err(err),
        }
        validate_redirect_uris(
            request.flow,
            request.redirect_uris.as_deref(),
            request.post_logout_redirect_uris.as_deref(),
        )?;
        // Surface a missing target before the selection is inspected.
        self.applications.get_by_id(id).await?;
        let selected = self.resolve_scope_selection(request.scope_ids).await?;

        let app = self
            .applications
            .update(
                id,
                UpdateApplication {
                    display_name: request.display_name,
                    client_id: request.client_id,
                    client_secret: request.client_secret,
                    flow: request.flow,
                    redirect_uris: request.redirect_uris,
                    post_logout_redirect_uris: request.post_logout_redirect_uris,
                    scope_ids: explicit_ids(&selected),
                },
            )
            .await?;

        let dto = self.project_one(&app).await?;
        self.mirror_upsert(&dto).await;
        Ok(dto)
    }

    pub async fn delete(&self, id: Uuid) -> DeskResult<()> {
        self.applications.delete(id).await?;
        if let Err(err) = self.registry.delete_application(id).await {
            warn!(application_id = %id, error = %err, "registry delete failed after commit");
        }
        Ok(())
    }

    /// Selection rules: at least one id, no duplicates counted twice,
    /// and every id must name an existing scope. Any existing scope is
    /// selectable; picking a global one simply stores no edge.
    async fn resolve_scope_selection(&self, ids: Option<Vec<Uuid>>) -> DeskResult<Vec<Scope>> {
        let ids = coverage::dedup_ids(ids);
        if ids.is_empty() {
            return Err(DeskError::Validation {
                message: "Application must include at least one scope".into(),
            });
        }
        let selected = self.scopes.get_by_ids(&ids).await?;
        if selected.len() != ids.len() {
            return Err(DeskError::InvalidReference {
                message: "One or more scope ids do not exist".into(),
            });
        }
        Ok(selected)
    }

    async fn project_one(&self, app: &Application) -> DeskResult<ApplicationDto> {
        let globals = self.global_scopes().await?;
        let explicit = self.scopes.get_by_ids(&app.scope_ids).await?;
        let by_id: HashMap<Uuid, &Scope> = explicit.iter().map(|s| (s.id, s)).collect();
        Ok(project(app, &globals, |id| by_id.get(&id).copied()))
    }

    async fn global_scopes(&self) -> DeskResult<Vec<Scope>> {
        let mut globals: Vec<Scope> = self
            .scopes
            .list_all()
            .await?
            .into_iter()
            .filter(Scope::is_global)
            .collect();
        globals.sort_by_key(|scope| scope.id);
        Ok(globals)
    }

    async fn mirror_upsert(&self, dto: &ApplicationDto) {
        let descriptor = descriptor(dto);
        if let Err(err) = self.registry.upsert_application(&descriptor).await {
            warn!(application_id = %dto.id, error = %err, "registry upsert failed after commit");
        }
    }
}

/// Redirect URIs only make sense for the browser-based PKCE flow.
fn validate_redirect_uris(
    flow: ApplicationFlow,
    redirect_uris: Option<&str>,
    post_logout_redirect_uris: Option<&str>,
) -> DeskResult<()> {
    if flow == ApplicationFlow::AuthorizationWithPkce {
        return Ok(());
    }
    let blank = |value: Option<&str>| value.is_none_or(|s| s.trim().is_empty());
    if blank(redirect_uris) && blank(post_logout_redirect_uris) {
        Ok(())
    } else {
        Err(DeskError::Validation {
            message: "Redirect URIs are only allowed for the AuthorizationWithPkce flow".into(),
        })
    }
}

fn explicit_ids(selected: &[Scope]) -> Vec<Uuid> {
    selected
        .iter()
        .filter(|scope| !scope.is_global())
        .map(|scope| scope.id)
        .collect()
}

/// Effective-scope projection: globals first (id order), then the
/// application's explicit grants in stored order.
fn project<'a>(
    app: &Application,
    globals: &[Scope],
    lookup: impl Fn(Uuid) -> Option<&'a Scope>,
) -> ApplicationDto {
    let scopes = globals
        .iter()
        .map(scope_reference)
        .chain(
            app.scope_ids
                .iter()
                .filter_map(|id| lookup(*id))
                .map(scope_reference),
        )
        .collect();
    ApplicationDto {
        id: app.id,
        display_name: app.display_name.clone(),
        client_id: app.client_id.clone(),
        client_secret: app.client_secret.clone(),
        flow: app.flow,
        post_logout_redirect_uris: app.post_logout_redirect_uris.clone(),
        redirect_uris: app.redirect_uris.clone(),
        scopes,
    }
}

fn scope_reference(scope: &Scope) -> ScopeReference {
    ScopeReference {
        id: scope.id,
        display_name: scope.display_name.clone(),
        scope_name: scope.scope_name.clone(),
        description: scope.description.clone(),
    }
}

fn descriptor(dto: &ApplicationDto) -> ApplicationDescriptor {
    ApplicationDescriptor {
        id: dto.id,
        client_id: dto.client_id.clone(),
        client_secret: dto.client_secret.clone(),
        display_name: dto.display_name.clone(),
        flow: dto.flow,
        redirect_uris: split_uris(dto.redirect_uris.as_deref()),
        post_logout_redirect_uris: split_uris(dto.post_logout_redirect_uris.as_deref()),
        scope_names: dto.scopes.iter().map(|s| s.scope_name.clone()).collect(),
    }
}

fn split_uris(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_uris_rejected_for_client_credentials() {
        let err = validate_redirect_uris(
            ApplicationFlow::ClientCredentials,
            Some("https://app.example/cb"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DeskError::Validation { .. }));
    }

    #[test]
    fn blank_redirect_uris_pass_for_client_credentials() {
        assert!(validate_redirect_uris(ApplicationFlow::ClientCredentials, Some("  "), None).is_ok());
        assert!(validate_redirect_uris(ApplicationFlow::ClientCredentials, None, None).is_ok());
    }

    #[test]
    fn split_uris_trims_and_drops_empty_parts() {
        assert_eq!(
            split_uris(Some("https://a/cb, https://b/cb ,,")),
            vec!["https://a/cb".to_string(), "https://b/cb".to_string()]
        );
        assert!(split_uris(None).is_empty());
    }
}
