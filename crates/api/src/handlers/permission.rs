//! Handlers for the `/permissions` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use warden_core::error::CoreError;
use warden_core::types::DbId;
use warden_core::validation::validate_input;
use warden_db::models::permission::{CreatePermission, Permission, UpdatePermission};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Permission",
        id,
    })
}

async fn require_permission(state: &AppState, id: DbId) -> AppResult<Permission> {
    state
        .store
        .find_permission(id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/permissions
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePermission>,
) -> AppResult<(StatusCode, Json<Permission>)> {
    validate_input(&input)?;
    let permission = state.store.create_permission(&input).await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

/// GET /api/v1/permissions
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Permission>>> {
    let permissions = state.store.list_permissions().await?;
    Ok(Json(permissions))
}

/// GET /api/v1/permissions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Permission>> {
    let permission = require_permission(&state, id).await?;
    Ok(Json(permission))
}

/// PUT /api/v1/permissions/{id}
pub async fn replace(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<CreatePermission>, AppError>,
) -> AppResult<Json<Permission>> {
    require_permission(&state, id).await?;
    let ApiJson(input) = body?;
    validate_input(&input)?;
    apply_update(&state, id, input.into()).await
}

/// PATCH /api/v1/permissions/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<UpdatePermission>, AppError>,
) -> AppResult<Json<Permission>> {
    require_permission(&state, id).await?;
    let ApiJson(input) = body?;
    validate_input(&input)?;
    apply_update(&state, id, input).await
}

async fn apply_update(
    state: &AppState,
    id: DbId,
    input: UpdatePermission,
) -> AppResult<Json<Permission>> {
    let permission = state
        .store
        .update_permission(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(permission))
}

/// DELETE /api/v1/permissions/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if state.store.delete_permission(id).await? {
        tracing::info!(permission_id = id, "Permission deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
