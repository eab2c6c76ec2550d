//! Application management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use authdesk_service::dto::{
    ApplicationDto, CreateApplicationRequest, CursorPage, UpdateApplicationRequest,
};

use crate::error::ApiResult;
use crate::handlers::{DEFAULT_PAGE_SIZE, PageQuery};
use crate::state::AppState;

pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<CursorPage<ApplicationDto>>> {
    let page = state
        .applications
        .get_page(
            query.cursor.as_deref(),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page))
}

pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApplicationDto>> {
    Ok(Json(state.applications.get_by_id(id).await?))
}

pub async fn create_application(
    State(state): State<AppState>,
    Json(request): Json<CreateApplicationRequest>,
) -> ApiResult<(StatusCode, Json<ApplicationDto>)> {
    let created = state.applications.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateApplicationRequest>,
) -> ApiResult<Json<ApplicationDto>> {
    Ok(Json(state.applications.update(id, request).await?))
}

pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.applications.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
