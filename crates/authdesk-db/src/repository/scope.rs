//! SurrealDB implementation of [`ScopeRepository`].

use std::collections::HashMap;

use authdesk_core::error::DeskResult;
use authdesk_core::models::scope::{CreateScope, Scope, UpdateScope};
use authdesk_core::repository::ScopeRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ScopeRow {
    display_name: String,
    scope_name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ScopeRowWithId {
    record_id: String,
    display_name: String,
    scope_name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for association edge queries.
#[derive(Debug, SurrealValue)]
struct EdgeRow {
    application_id: String,
    scope_id: String,
}

impl ScopeRow {
    fn into_scope(self, id: Uuid, application_ids: Vec<Uuid>) -> Scope {
        Scope {
            id,
            display_name: self.display_name,
            scope_name: self.scope_name,
            description: self.description,
            application_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ScopeRowWithId {
    fn try_into_scope(self, application_ids: Vec<Uuid>) -> Result<Scope, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Scope {
            id,
            display_name: self.display_name,
            scope_name: self.scope_name,
            description: self.description,
            application_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Scope repository.
#[derive(Clone)]
pub struct SurrealScopeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealScopeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Application ids explicitly associated with one scope.
    async fn load_application_ids(&self, id: Uuid) -> Result<Vec<Uuid>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT application_id, scope_id FROM application_scope \
                 WHERE scope_id = $scope_id",
            )
            .bind(("scope_id", id.to_string()))
            .await?;

        let rows: Vec<EdgeRow> = result.take(0)?;
        rows.iter()
            .map(|row| {
                Uuid::parse_str(&row.application_id)
                    .map_err(|e| DbError::Migration(format!("invalid application UUID: {e}")))
            })
            .collect()
    }

    /// Application ids for a batch of scopes, grouped by scope.
    async fn load_application_ids_for(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<Uuid>>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT application_id, scope_id FROM application_scope \
                 WHERE scope_id IN $ids",
            )
            .bind(("ids", ids.to_vec()))
            .await?;

        let rows: Vec<EdgeRow> = result.take(0)?;
        let mut grouped: HashMap<String, Vec<Uuid>> = HashMap::new();
        for row in rows {
            let application_id = Uuid::parse_str(&row.application_id)
                .map_err(|e| DbError::Migration(format!("invalid application UUID: {e}")))?;
            grouped.entry(row.scope_id).or_default().push(application_id);
        }
        Ok(grouped)
    }

    /// Replace the scope's association edges wholesale.
    async fn replace_edges(&self, id: Uuid, application_ids: &[Uuid]) -> Result<(), DbError> {
        self.db
            .query("DELETE application_scope WHERE scope_id = $scope_id")
            .bind(("scope_id", id.to_string()))
            .await?;

        for application_id in application_ids {
            self.db
                .query(
                    "CREATE application_scope SET \
                     application_id = $application_id, scope_id = $scope_id",
                )
                .bind(("application_id", application_id.to_string()))
                .bind(("scope_id", id.to_string()))
                .await?
                .check()
                .map_err(|e| DbError::Migration(e.to_string()))?;
        }
        Ok(())
    }
}

impl<C: Connection> ScopeRepository for SurrealScopeRepository<C> {
    async fn create(&self, input: CreateScope) -> DeskResult<Scope> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('scope', $id) SET \
                 display_name = $display_name, \
                 scope_name = $scope_name, \
                 description = $description",
            )
            .bind(("id", id_str.clone()))
            .bind(("display_name", input.display_name))
            .bind(("scope_name", input.scope_name))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ScopeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "scope".into(),
            id: id_str,
        })?;

        self.replace_edges(id, &input.application_ids).await?;

        Ok(row.into_scope(id, input.application_ids))
    }

    async fn get_by_id(&self, id: Uuid) -> DeskResult<Scope> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('scope', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "scope".into(),
            id: id_str,
        })?;

        let application_ids = self.load_application_ids(id).await?;
        Ok(row.into_scope(id, application_ids))
    }

    async fn get_by_scope_name(&self, scope_name: &str) -> DeskResult<Scope> {
        let scope_name_owned = scope_name.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM scope WHERE scope_name = $scope_name",
            )
            .bind(("scope_name", scope_name_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "scope".into(),
            id: format!("scope_name={scope_name}"),
        })?;

        let id = Uuid::parse_str(&row.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let application_ids = self.load_application_ids(id).await?;
        Ok(row.try_into_scope(application_ids)?)
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> DeskResult<Vec<Scope>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_strs: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM scope WHERE meta::id(id) IN $ids \
                 ORDER BY id ASC",
            )
            .bind(("ids", id_strs.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRowWithId> = result.take(0).map_err(DbError::from)?;
        let mut edges = self.load_application_ids_for(&id_strs).await?;

        rows.into_iter()
            .map(|row| {
                let application_ids = edges.remove(&row.record_id).unwrap_or_default();
                row.try_into_scope(application_ids)
            })
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn update(&self, id: Uuid, input: UpdateScope) -> DeskResult<Scope> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('scope', $id) SET \
                 display_name = $display_name, \
                 scope_name = $scope_name, \
                 description = $description, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("display_name", input.display_name))
            .bind(("scope_name", input.scope_name))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ScopeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "scope".into(),
            id: id_str,
        })?;

        self.replace_edges(id, &input.application_ids).await?;

        Ok(row.into_scope(id, input.application_ids))
    }

    async fn delete(&self, id: Uuid) -> DeskResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('scope', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "scope".into(),
                id: id_str,
            }
            .into());
        }

        // Cascade: association edges first, then the record.
        self.db
            .query("DELETE application_scope WHERE scope_id = $scope_id")
            .bind(("scope_id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        self.db
            .query("DELETE type::record('scope', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_after(&self, after: Option<Uuid>, limit: u32) -> DeskResult<Vec<Scope>> {
        let result = match after {
            Some(after) => {
                self.db
                    .query(
                        "SELECT meta::id(id) AS record_id, * \
                         FROM scope WHERE meta::id(id) > $after \
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
                         FROM scope \
                         ORDER BY id ASC LIMIT $limit",
                    )
                    .bind(("limit", limit))
                    .await
            }
        };

        let mut result = result.map_err(DbError::from)?;
        let rows: Vec<ScopeRowWithId> = result.take(0).map_err(DbError::from)?;

        let ids: Vec<String> = rows.iter().map(|row| row.record_id.clone()).collect();
        let mut edges = if ids.is_empty() {
            HashMap::new()
        } else {
            self.load_application_ids_for(&ids).await?
        };

        rows.into_iter()
            .map(|row| {
                let application_ids = edges.remove(&row.record_id).unwrap_or_default();
                row.try_into_scope(application_ids)
            })
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn list_all(&self) -> DeskResult<Vec<Scope>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM scope ORDER BY id ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRowWithId> = result.take(0).map_err(DbError::from)?;

        let mut edge_result = self
            .db
            .query("SELECT application_id, scope_id FROM application_scope")
            .await
            .map_err(DbError::from)?;
        let edge_rows: Vec<EdgeRow> = edge_result.take(0).map_err(DbError::from)?;

        let mut edges: HashMap<String, Vec<Uuid>> = HashMap::new();
        for row in edge_rows {
            let application_id = Uuid::parse_str(&row.application_id)
                .map_err(|e| DbError::Migration(format!("invalid application UUID: {e}")))?;
            edges.entry(row.scope_id).or_default().push(application_id);
        }

        rows.into_iter()
            .map(|row| {
                let application_ids = edges.remove(&row.record_id).unwrap_or_default();
                row.try_into_scope(application_ids)
            })
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}
