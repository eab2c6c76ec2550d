//! Integration tests for the application service against in-memory
//! SurrealDB: uniqueness, redirect-URI gating, scope selection, and
//! effective-scope projection.

use authdesk_core::DeskError;
use authdesk_core::models::application::ApplicationFlow;
use authdesk_db::repository::{SurrealApplicationRepository, SurrealScopeRepository};
use authdesk_service::dto::{
    CreateApplicationRequest, CreateScopeRequest, UpdateApplicationRequest,
};
use authdesk_service::{ApplicationService, ScopeService};
use authdesk_sync::NoopRegistrySync;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Apps = ApplicationService<
    SurrealApplicationRepository<Db>,
    SurrealScopeRepository<Db>,
    NoopRegistrySync,
>;
type Scopes = ScopeService<
    SurrealScopeRepository<Db>,
    SurrealApplicationRepository<Db>,
    NoopRegistrySync,
>;

/// Helper: in-memory DB, migrations, both services over it.
async fn setup() -> (Apps, Scopes) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    authdesk_db::run_migrations(&db).await.unwrap();

    let apps = ApplicationService::new(
        SurrealApplicationRepository::new(db.clone()),
        SurrealScopeRepository::new(db.clone()),
        NoopRegistrySync,
    );
    let scopes = ScopeService::new(
        SurrealScopeRepository::new(db.clone()),
        SurrealApplicationRepository::new(db),
        NoopRegistrySync,
    );
    (apps, scopes)
}

fn scope_request(name: &str, application_ids: Option<Vec<Uuid>>) -> CreateScopeRequest {
    CreateScopeRequest {
        display_name: format!("Scope {name}"),
        scope_name: name.into(),
        description: "test scope".into(),
        application_ids,
    }
}

fn app_request(client_id: &str, scope_ids: Vec<Uuid>) -> CreateApplicationRequest {
    CreateApplicationRequest {
        display_name: format!("App {client_id}"),
        client_id: client_id.into(),
        client_secret: "secret".into(),
        flow: ApplicationFlow::ClientCredentials,
        post_logout_redirect_uris: None,
        redirect_uris: None,
        scope_ids: Some(scope_ids),
    }
}

#[tokio::test]
async fn create_requires_at_least_one_scope() {
    let (apps, _) = setup().await;

    let empty = apps.create(app_request("no-scopes", vec![])).await;
    assert!(matches!(empty, Err(DeskError::Validation { .. })));

    let mut absent = app_request("no-scopes", vec![]);
    absent.scope_ids = None;
    let absent = apps.create(absent).await;
    assert!(matches!(absent, Err(DeskError::Validation { .. })));
}

#[tokio::test]
async fn unknown_scope_id_is_rejected() {
    let (apps, _) = setup().await;

    let result = apps
        .create(app_request("bad-scope", vec![Uuid::new_v4()]))
        .await;
    assert!(matches!(result, Err(DeskError::InvalidReference { .. })));
}

#[tokio::test]
async fn duplicate_client_id_is_rejected_but_self_update_passes() {
    let (apps, scopes) = setup().await;

    let global = scopes.create(scope_request("openid", None)).await.unwrap();
    let first = apps
        .create(app_request("taken", vec![global.id]))
        .await
        .unwrap();

    let second = apps.create(app_request("taken", vec![global.id])).await;
    assert!(matches!(second, Err(DeskError::Duplicate { .. })));

    // Updating an application without changing its client_id is fine.
    let updated = apps
        .update(
            first.id,
            UpdateApplicationRequest {
                display_name: "Renamed".into(),
                client_id: "taken".into(),
                client_secret: "rotated".into(),
                flow: ApplicationFlow::ClientCredentials,
                post_logout_redirect_uris: None,
                redirect_uris: None,
                scope_ids: Some(vec![global.id]),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.display_name, "Renamed");
}

#[tokio::test]
async fn redirect_uris_require_the_pkce_flow() {
    let (apps, scopes) = setup().await;

    let global = scopes.create(scope_request("openid", None)).await.unwrap();

    let mut rejected = app_request("machine", vec![global.id]);
    rejected.redirect_uris = Some("https://app.example/cb".into());
    let result = apps.create(rejected).await;
    assert!(matches!(result, Err(DeskError::Validation { .. })));

    let mut allowed = app_request("browser", vec![global.id]);
    allowed.flow = ApplicationFlow::AuthorizationWithPkce;
    allowed.redirect_uris = Some("https://app.example/cb".into());
    allowed.post_logout_redirect_uris = Some("https://app.example/logout".into());
    let created = apps.create(allowed).await.unwrap();
    assert_eq!(created.flow, ApplicationFlow::AuthorizationWithPkce);
    assert_eq!(created.redirect_uris.as_deref(), Some("https://app.example/cb"));
}

#[tokio::test]
async fn selecting_a_global_scope_stores_no_explicit_edge() {
    let (apps, scopes) = setup().await;

    let global = scopes.create(scope_request("openid", None)).await.unwrap();
    let app = apps
        .create(app_request("implicit", vec![global.id]))
        .await
        .unwrap();

    // The application still sees the scope through the global grant.
    assert_eq!(app.scopes.len(), 1);
    assert_eq!(app.scopes[0].id, global.id);

    // No edge means the scope stays global.
    let fetched = scopes.get_by_id(global.id).await.unwrap();
    assert!(fetched.applications.is_empty());
}

#[tokio::test]
async fn effective_scopes_merge_globals_with_explicit_grants() {
    let (apps, scopes) = setup().await;

    let global = scopes.create(scope_request("openid", None)).await.unwrap();
    let app = apps
        .create(app_request("merged", vec![global.id]))
        .await
        .unwrap();
    let explicit = scopes
        .create(scope_request("orders:read", Some(vec![app.id])))
        .await
        .unwrap();

    let fetched = apps.get_by_id(app.id).await.unwrap();
    let names: Vec<&str> = fetched.scopes.iter().map(|s| s.scope_name.as_str()).collect();
    assert_eq!(fetched.scopes.len(), 2);
    assert!(names.contains(&"openid"));
    assert!(names.contains(&"orders:read"));
    assert!(fetched.scopes.iter().any(|s| s.id == explicit.id));
}

#[tokio::test]
async fn update_replaces_the_scope_selection() {
    let (apps, scopes) = setup().await;

    let global = scopes.create(scope_request("openid", None)).await.unwrap();
    let app = apps
        .create(app_request("reselect", vec![global.id]))
        .await
        .unwrap();
    let explicit = scopes
        .create(scope_request("reports:read", Some(vec![app.id])))
        .await
        .unwrap();

    let updated = apps
        .update(
            app.id,
            UpdateApplicationRequest {
                display_name: app.display_name.clone(),
                client_id: app.client_id.clone(),
                client_secret: app.client_secret.clone(),
                flow: app.flow,
                post_logout_redirect_uris: None,
                redirect_uris: None,
                scope_ids: Some(vec![explicit.id]),
            },
        )
        .await
        .unwrap();

    // Globals always show up; the explicit grant survived the replace.
    assert_eq!(updated.scopes.len(), 2);
    assert!(updated.scopes.iter().any(|s| s.id == explicit.id));
    assert!(updated.scopes.iter().any(|s| s.id == global.id));
}

#[tokio::test]
async fn deleting_an_application_cascades_its_edges() {
    let (apps, scopes) = setup().await;

    let global = scopes.create(scope_request("openid", None)).await.unwrap();
    let app = apps
        .create(app_request("doomed", vec![global.id]))
        .await
        .unwrap();
    let explicit = scopes
        .create(scope_request("tmp:read", Some(vec![app.id])))
        .await
        .unwrap();
    assert_eq!(explicit.applications.len(), 1);

    apps.delete(app.id).await.unwrap();
    assert!(matches!(
        apps.get_by_id(app.id).await,
        Err(DeskError::NotFound { .. })
    ));

    // The orphaned scope loses its association and turns global.
    let fetched = scopes.get_by_id(explicit.id).await.unwrap();
    assert!(fetched.applications.is_empty());
}

#[tokio::test]
async fn get_unknown_application_is_not_found() {
    let (apps, _) = setup().await;
    let result = apps.get_by_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DeskError::NotFound { .. })));
}
