//! Integration tests for the Application repository implementation
//! using in-memory SurrealDB.

use authdesk_core::models::application::{ApplicationFlow, CreateApplication, UpdateApplication};
use authdesk_core::repository::ApplicationRepository;
use authdesk_db::repository::SurrealApplicationRepository;
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

fn create_input(client_id: &str, scope_ids: Vec<Uuid>) -> CreateApplication {
    CreateApplication {
        display_name: format!("App {client_id}"),
        client_id: client_id.into(),
        client_secret: "secret".into(),
        flow: ApplicationFlow::ClientCredentials,
        redirect_uris: None,
        post_logout_redirect_uris: None,
        scope_ids,
    }
}

#[tokio::test]
async fn create_and_get_application() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    let scope_id = Uuid::new_v4();
    let app = repo
        .create(create_input("web-portal", vec![scope_id]))
        .await
        .unwrap();

    assert_eq!(app.client_id, "web-portal");
    assert_eq!(app.flow, ApplicationFlow::ClientCredentials);
    assert_eq!(app.scope_ids, vec![scope_id]);

    let fetched = repo.get_by_id(app.id).await.unwrap();
    assert_eq!(fetched.id, app.id);
    assert_eq!(fetched.client_id, app.client_id);
    assert_eq!(fetched.scope_ids, vec![scope_id]);
}

#[tokio::test]
async fn get_application_by_client_id() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    let app = repo
        .create(create_input("lookup-me", vec![]))
        .await
        .unwrap();

    let fetched = repo.get_by_client_id("lookup-me").await.unwrap();
    assert_eq!(fetched.id, app.id);

    let missing = repo.get_by_client_id("no-such-client").await;
    assert!(missing.is_err(), "unknown client_id should not resolve");
}

#[tokio::test]
async fn duplicate_client_id_is_rejected_by_index() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    repo.create(create_input("dup-client", vec![]))
        .await
        .unwrap();
    let second = repo.create(create_input("dup-client", vec![])).await;
    assert!(second.is_err(), "unique index should reject the duplicate");
}

#[tokio::test]
async fn update_application_replaces_fields_and_edges() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    let old_scope = Uuid::new_v4();
    let app = repo
        .create(create_input("update-me", vec![old_scope]))
        .await
        .unwrap();

    let new_scope = Uuid::new_v4();
    let updated = repo
        .update(
            app.id,
            UpdateApplication {
                display_name: "Renamed".into(),
                client_id: "update-me".into(),
                client_secret: "rotated".into(),
                flow: ApplicationFlow::AuthorizationWithPkce,
                redirect_uris: Some("https://app.example/cb".into()),
                post_logout_redirect_uris: None,
                scope_ids: vec![new_scope],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, app.id);
    assert_eq!(updated.display_name, "Renamed");
    assert_eq!(updated.flow, ApplicationFlow::AuthorizationWithPkce);
    assert_eq!(updated.scope_ids, vec![new_scope]);

    // The stored edges were replaced wholesale.
    let fetched = repo.get_by_id(app.id).await.unwrap();
    assert_eq!(fetched.scope_ids, vec![new_scope]);
}

#[tokio::test]
async fn delete_application_removes_record_and_edges() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db.clone());

    let scope_id = Uuid::new_v4();
    let app = repo
        .create(create_input("delete-me", vec![scope_id]))
        .await
        .unwrap();

    repo.delete(app.id).await.unwrap();
    assert!(repo.get_by_id(app.id).await.is_err());

    // Edge rows for the application are gone too.
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
async fn delete_missing_application_fails() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    let result = repo.delete(Uuid::new_v4()).await;
    assert!(result.is_err(), "deleting an unknown id should fail");
}

#[tokio::test]
async fn list_after_orders_by_id_and_respects_limit() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    for i in 0..5 {
        repo.create(create_input(&format!("client-{i}"), vec![]))
            .await
            .unwrap();
    }

    let all = repo.list_after(None, 10).await.unwrap();
    assert_eq!(all.len(), 5);
    let ids: Vec<String> = all.iter().map(|a| a.id.to_string()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted, "listing must be ordered by id ascending");

    let limited = repo.list_after(None, 2).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, all[0].id);

    // Resuming after the second item yields the remaining three.
    let rest = repo.list_after(Some(all[1].id), 10).await.unwrap();
    assert_eq!(rest.len(), 3);
    assert_eq!(rest[0].id, all[2].id);
}

#[tokio::test]
async fn list_ids_and_count_existing() {
    let db = setup().await;
    let repo = SurrealApplicationRepository::new(db);

    let a = repo.create(create_input("count-a", vec![])).await.unwrap();
    let b = repo.create(create_input("count-b", vec![])).await.unwrap();

    let mut ids = repo.list_ids().await.unwrap();
    ids.sort();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(ids, expected);

    let existing = repo
        .count_existing(&[a.id, b.id, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(existing, 2);
    assert_eq!(repo.count_existing(&[]).await.unwrap(), 0);
}
