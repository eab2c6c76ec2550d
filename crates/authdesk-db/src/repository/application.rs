//! SurrealDB implementation of [`ApplicationRepository`].

use std::collections::HashMap;

use authdesk_core::error::DeskResult;
use authdesk_core::models::application::{
    Application, ApplicationFlow, CreateApplication, UpdateApplication,
};
use authdesk_core::repository::ApplicationRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ApplicationRow {
    display_name: String,
    client_id: String,
    client_secret: String,
    flow: String,
    redirect_uris: Option<String>,
    post_logout_redirect_uris: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ApplicationRowWithId {
    record_id: String,
    display_name: String,
    client_id: String,
    client_secret: String,
    flow: String,
    redirect_uris: Option<String>,
    post_logout_redirect_uris: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for association edge queries.
#[derive(Debug, SurrealValue)]
struct EdgeRow {
    application_id: String,
    scope_id: String,
}

/// Row struct for id-only projections.
#[derive(Debug, SurrealValue)]
struct IdRow {
    record_id: String,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_flow(s: &str) -> Result<ApplicationFlow, DbError> {
    match s {
        "ClientCredentials" => Ok(ApplicationFlow::ClientCredentials),
        "AuthorizationWithPkce" => Ok(ApplicationFlow::AuthorizationWithPkce),
        other => Err(DbError::Migration(format!(
            "unknown application flow: {other}"
        ))),
    }
}

fn flow_to_string(flow: &ApplicationFlow) -> &'static str {
    match flow {
        ApplicationFlow::ClientCredentials => "ClientCredentials",
        ApplicationFlow::AuthorizationWithPkce => "AuthorizationWithPkce",
    }
}

impl ApplicationRow {
    fn into_application(self, id: Uuid, scope_ids: Vec<Uuid>) -> Result<Application, DbError> {
        Ok(Application {
            id,
            display_name: self.display_name,
            client_id: self.client_id,
            client_secret: self.client_secret,
            flow: parse_flow(&self.flow)?,
            redirect_uris: self.redirect_uris,
            post_logout_redirect_uris: self.post_logout_redirect_uris,
            scope_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ApplicationRowWithId {
    fn try_into_application(self, scope_ids: Vec<Uuid>) -> Result<Application, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Application {
            id,
            display_name: self.display_name,
            client_id: self.client_id,
            client_secret: self.client_secret,
            flow: parse_flow(&self.flow)?,
            redirect_uris: self.redirect_uris,
            post_logout_redirect_uris: self.post_logout_redirect_uris,
            scope_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Application repository.
#[derive(Clone)]
pub struct SurrealApplicationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealApplicationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Scope ids explicitly associated with one application.
    async fn load_scope_ids(&self, id: Uuid) -> Result<Vec<Uuid>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT application_id, scope_id FROM application_scope \
                 WHERE application_id = $application_id",
            )
            .bind(("application_id", id.to_string()))
            .await?;

        let rows: Vec<EdgeRow> = result.take(0)?;
        rows.iter()
            .map(|row| {
                Uuid::parse_str(&row.scope_id)
                    .map_err(|e| DbError::Migration(format!("invalid scope UUID: {e}")))
            })
            .collect()
    }

    /// Scope ids for a batch of applications, grouped by application.
    async fn load_scope_ids_for(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<Uuid>>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT application_id, scope_id FROM application_scope \
                 WHERE application_id IN $ids",
            )
            .bind(("ids", ids.to_vec()))
            .await?;

        let rows: Vec<EdgeRow> = result.take(0)?;
        let mut grouped: HashMap<String, Vec<Uuid>> = HashMap::new();
        for row in rows {
            let scope_id = Uuid::parse_str(&row.scope_id)
                .map_err(|e| DbError::Migration(format!("invalid scope UUID: {e}")))?;
            grouped.entry(row.application_id).or_default().push(scope_id);
        }
        Ok(grouped)
    }

    /// Replace the application's association edges wholesale.
    async fn replace_edges(&self, id: Uuid, scope_ids: &[Uuid]) -> Result<(), DbError> {
        self.db
            .query("DELETE application_scope WHERE application_id = $application_id")
            .bind(("application_id", id.to_string()))
            .await?;

        for scope_id in scope_ids {
            self.db
                .query(
                    "CREATE application_scope SET \
                     application_id = $application_id, scope_id = $scope_id",
                )
                .bind(("application_id", id.to_string()))
                .bind(("scope_id", scope_id.to_string()))
                .await?
                .check()
                .map_err(|e| DbError::Migration(e.to_string()))?;
        }
        Ok(())
    }
}

impl<C: Connection> ApplicationRepository for SurrealApplicationRepository<C> {
    async fn create(&self, input: CreateApplication) -> DeskResult<Application> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('application', $id) SET \
                 display_name = $display_name, \
                 client_id = $client_id, \
                 client_secret = $client_secret, \
                 flow = $flow, \
                 redirect_uris = $redirect_uris, \
                 post_logout_redirect_uris = $post_logout_redirect_uris",
            )
            .bind(("id", id_str.clone()))
            .bind(("display_name", input.display_name))
            .bind(("client_id", input.client_id))
            .bind(("client_secret", input.client_secret))
            .bind(("flow", flow_to_string(&input.flow).to_string()))
            .bind(("redirect_uris", input.redirect_uris))
            .bind((
                "post_logout_redirect_uris",
                input.post_logout_redirect_uris,
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "application".into(),
            id: id_str,
        })?;

        self.replace_edges(id, &input.scope_ids).await?;

        Ok(row.into_application(id, input.scope_ids)?)
    }

    async fn get_by_id(&self, id: Uuid) -> DeskResult<Application> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('application', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "application".into(),
            id: id_str,
        })?;

        let scope_ids = self.load_scope_ids(id).await?;
        Ok(row.into_application(id, scope_ids)?)
    }

    async fn get_by_client_id(&self, client_id: &str) -> DeskResult<Application> {
        let client_id_owned = client_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM application WHERE client_id = $client_id",
            )
            .bind(("client_id", client_id_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "application".into(),
            id: format!("client_id={client_id}"),
        })?;

        let id = Uuid::parse_str(&row.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let scope_ids = self.load_scope_ids(id).await?;
        Ok(row.try_into_application(scope_ids)?)
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> DeskResult<Vec<Application>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_strs: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM application WHERE meta::id(id) IN $ids \
                 ORDER BY id ASC",
            )
            .bind(("ids", id_strs.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;
        let mut edges = self.load_scope_ids_for(&id_strs).await?;

        rows.into_iter()
            .map(|row| {
                let scope_ids = edges.remove(&row.record_id).unwrap_or_default();
                row.try_into_application(scope_ids)
            })
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn update(&self, id: Uuid, input: UpdateApplication) -> DeskResult<Application> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('application', $id) SET \
                 display_name = $display_name, \
                 client_id = $client_id, \
                 client_secret = $client_secret, \
                 flow = $flow, \
                 redirect_uris = $redirect_uris, \
                 post_logout_redirect_uris = $post_logout_redirect_uris, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("display_name", input.display_name))
            .bind(("client_id", input.client_id))
            .bind(("client_secret", input.client_secret))
            .bind(("flow", flow_to_string(&input.flow).to_string()))
            .bind(("redirect_uris", input.redirect_uris))
            .bind((
                "post_logout_redirect_uris",
                input.post_logout_redirect_uris,
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "application".into(),
            id: id_str,
        })?;

        self.replace_edges(id, &input.scope_ids).await?;

        Ok(row.into_application(id, input.scope_ids)?)
    }

    async fn delete(&self, id: Uuid) -> DeskResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('application', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "application".into(),
                id: id_str,
            }
            .into());
        }

        // Cascade: association edges first, then the record.
        self.db
            .query("DELETE application_scope WHERE application_id = $application_id")
            .bind(("application_id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        self.db
            .query("DELETE type::record('application', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_after(&self, after: Option<Uuid>, limit: u32) -> DeskResult<Vec<Application>> {
        let result = match after {
            Some(after) => {
                self.db
                    .query(
                        "SELECT meta::id(id) AS record_id, * \
                         FROM application WHERE meta::id(id) > $after \
                         ORDER BY id ASC LIMIT $limit",
                    )
                    .bind(("after", after.to_string()))
                    .bind(("limit", limit))
                    .await
            }
            None => {
                self.db
                    .query(
                        "SELECT meta::id(id) AS record_id, * \
                         FROM application \
                         ORDER BY id ASC LIMIT $limit",
                    )
                    .bind(("limit", limit))
                    .await
            }
        };

        let mut result = result.map_err(DbError::from)?;
        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;

        let ids: Vec<String> = rows.iter().map(|row| row.record_id.clone()).collect();
        let mut edges = if ids.is_empty() {
            HashMap::new()
        } else {
            self.load_scope_ids_for(&ids).await?
        };

        rows.into_iter()
            .map(|row| {
                let scope_ids = edges.remove(&row.record_id).unwrap_or_default();
                row.try_into_application(scope_ids)
            })
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn list_ids(&self) -> DeskResult<Vec<Uuid>> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id FROM application")
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdRow> = result.take(0).map_err(DbError::from)?;
        rows.iter()
            .map(|row| {
                Uuid::parse_str(&row.record_id)
                    .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))
            })
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn count_existing(&self, ids: &[Uuid]) -> DeskResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let id_strs: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM application \
                 WHERE meta::id(id) IN $ids GROUP ALL",
            )
            .bind(("ids", id_strs))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
