//! Integration tests for the Scope repository implementation using
//! in-memory SurrealDB.

use authdesk_core::models::scope::{CreateScope, UpdateScope};
use authdesk_core::repository::ScopeRepository;
use authdesk_db::repository::SurrealScopeRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    authdesk_db::run_migrations(&db).await.unwrap();
    db
}

fn create_input(scope_name: &str, application_ids: Vec<Uuid>) -> CreateScope {
    CreateScope {
        display_name: format!("Scope {scope_name}"),
        scope_name: scope_name.into(),
        description: "test scope".into(),
        application_ids,
    }
}

#[tokio::test]
async fn create_and_get_scope() {
    let db = setup().await;
    let repo = SurrealScopeRepository::new(db);

    let app_id = Uuid::new_v4();
    let scope = repo
        .create(create_input("orders:read", vec![app_id]))
        .await
        .unwrap();

    assert_eq!(scope.scope_name, "orders:read");
    assert_eq!(scope.application_ids, vec![app_id]);
    assert!(!scope.is_global());

    let fetched = repo.get_by_id(scope.id).await.unwrap();
    assert_eq!(fetched.id, scope.id);
    assert_eq!(fetched.application_ids, vec![app_id]);
}

#[tokio::test]
async fn scope_without_associations_is_global() {
    let db = setup().await;
    let repo = SurrealScopeRepository::new(db);

    let scope = repo.create(create_input("openid", vec![])).await.unwrap();
    assert!(scope.is_global());

    let fetched = repo.get_by_id(scope.id).await.unwrap();
    assert!(fetched.is_global());
}

#[tokio::test]
async fn get_scope_by_scope_name() {
    let db = setup().await;
    let repo = SurrealScopeRepository::new(db);

    let scope = repo.create(create_input("profile", vec![])).await.unwrap();

    let fetched = repo.get_by_scope_name("profile").await.unwrap();
    assert_eq!(fetched.id, scope.id);

    assert!(repo.get_by_scope_name("missing").await.is_err());
}

#[tokio::test]
async fn duplicate_scope_name_is_rejected_by_index() {
    let db = setup().await;
    let repo = SurrealScopeRepository::new(db);

    repo.create(create_input("dup:scope", vec![]))
        .await
        .unwrap();
    let second = repo.create(create_input("dup:scope", vec![])).await;
    assert!(second.is_err(), "unique index should reject the duplicate");
}

#[tokio::test]
async fn update_scope_can_flip_between_global_and_explicit() {
    let db = setup().await;
    let repo = SurrealScopeRepository::new(db);

    let scope = repo.create(create_input("flip", vec![])).await.unwrap();
    assert!(scope.is_global());

    let app_id = Uuid::new_v4();
    let narrowed = repo
        .update(
            scope.id,
            UpdateScope {
                display_name: scope.display_name.clone(),
                scope_name: "flip".into(),
                description: scope.description.clone(),
                application_ids: vec![app_id],
            },
        )
        .await
        .unwrap();
    assert!(!narrowed.is_global());
    assert_eq!(narrowed.application_ids, vec![app_id]);

    let widened = repo
        .update(
            scope.id,
            UpdateScope {
                display_name: narrowed.display_name.clone(),
                scope_name: "flip".into(),
                description: narrowed.description.clone(),
                application_ids: vec![],
            },
        )
        .await
        .unwrap();
    assert!(widened.is_global());

    let fetched = repo.get_by_id(scope.id).await.unwrap();
    assert!(fetched.is_global(), "old edges must not survive the update");
}

#[tokio::test]
async fn delete_scope_removes_record_and_edges() {
    let db = setup().await;
    let repo = SurrealScopeRepository::new(db.clone());

    let app_id = Uuid::new_v4();
    let scope = repo
        .create(create_input("bye", vec![app_id]))
        .await
        .unwrap();

    repo.delete(scope.id).await.unwrap();
    assert!(repo.get_by_id(scope.id).await.is_err());

    #[derive(Debug, surrealdb_types::SurrealValue)]
    struct CountRow {
        total: u64,
    }
    let mut result = db
        .query("SELECT count() AS total FROM application_scope GROUP ALL")
        .await
        .unwrap();
    let counts: Vec<CountRow> = result.take(0).unwrap();
    assert_eq!(counts.first().map(|c| c.total).unwrap_or(0), 0);
}

#[tokio::test]
async fn list_after_orders_by_id_and_respects_limit() {
    let db = setup().await;
    let repo = SurrealScopeRepository::new(db);

    for i in 0..5 {
        repo.create(create_input(&format!("scope-{i}"), vec![]))
            .await
            .unwrap();
    }

    let all = repo.list_after(None, 10).await.unwrap();
    assert_eq!(all.len(), 5);
    let ids: Vec<String> = all.iter().map(|s| s.id.to_string()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted, "listing must be ordered by id ascending");

    let rest = repo.list_after(Some(all[2].id), 10).await.unwrap();
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[0].id, all[3].id);
}

#[tokio::test]
async fn list_all_groups_association_edges() {
    let db = setup().await;
    let repo = SurrealScopeRepository::new(db);

    let app_a = Uuid::new_v4();
    let app_b = Uuid::new_v4();
    let explicit = repo
        .create(create_input("grouped", vec![app_a, app_b]))
        .await
        .unwrap();
    let global = repo.create(create_input("email", vec![])).await.unwrap();

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.len(), 2);

    let fetched_explicit = all.iter().find(|s| s.id == explicit.id).unwrap();
    let mut got = fetched_explicit.application_ids.clone();
    got.sort();
    let mut expected = vec![app_a, app_b];
    expected.sort();
    assert_eq!(got, expected);

    let fetched_global = all.iter().find(|s| s.id == global.id).unwrap();
    assert!(fetched_global.is_global());
}
