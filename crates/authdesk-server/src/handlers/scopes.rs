//! Scope management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use authdesk_service::dto::{CreateScopeRequest, CursorPage, ScopeDto, UpdateScopeRequest};

use crate::error::ApiResult;
use crate::handlers::{DEFAULT_PAGE_SIZE, PageQuery};
use crate::state::AppState;

pub async fn list_scopes(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<CursorPage<ScopeDto>>> {
    let page = state
        .scopes
        .get_page(
            query.cursor.as_deref(),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page))
}

pub async fn get_scope(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ScopeDto>> {
    Ok(Json(state.scopes.get_by_id(id).await?))
}

pub async fn create_scope(
    State(state): State<AppState>,
    Json(request): Json<CreateScopeRequest>,
) -> ApiResult<(StatusCode, Json<ScopeDto>)> {
    let created = state.scopes.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_scope(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateScopeRequest>,
) -> ApiResult<Json<ScopeDto>> {
    Ok(Json(state.scopes.update(id, request).await?))
}

pub async fn delete_scope(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.scopes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
