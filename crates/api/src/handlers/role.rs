//! Handlers for the `/roles` resource and its permission actions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use warden_core::error::CoreError;
use warden_core::relations::Relation;
use warden_core::types::DbId;
use warden_core::validation::validate_input;
use warden_db::models::permission::Permission;
use warden_db::models::role::{CreateRole, RoleDetail, RolePermissionRequest, UpdateRole};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::handlers::{require_owner, require_target};
use crate::response::StatusResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Role", id })
}

async fn require_role(state: &AppState, id: DbId) -> AppResult<RoleDetail> {
    state
        .store
        .find_role(id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/roles
///
/// A `permissions` array in the body is ignored.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateRole>,
) -> AppResult<(StatusCode, Json<RoleDetail>)> {
    validate_input(&input)?;
    let role = state.store.create_role(&input).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// GET /api/v1/roles
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<RoleDetail>>> {
    let roles = state.store.list_roles().await?;
    Ok(Json(roles))
}

/// GET /api/v1/roles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<RoleDetail>> {
    let role = require_role(&state, id).await?;
    Ok(Json(role))
}

/// PUT /api/v1/roles/{id}
pub async fn replace(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<CreateRole>, AppError>,
) -> AppResult<Json<RoleDetail>> {
    require_role(&state, id).await?;
    let ApiJson(input) = body?;
    validate_input(&input)?;
    apply_update(&state, id, input.into()).await
}

/// PATCH /api/v1/roles/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<UpdateRole>, AppError>,
) -> AppResult<Json<RoleDetail>> {
    require_role(&state, id).await?;
    let ApiJson(input) = body?;
    validate_input(&input)?;
    apply_update(&state, id, input).await
}

async fn apply_update(
    state: &AppState,
    id: DbId,
    input: UpdateRole,
) -> AppResult<Json<RoleDetail>> {
    let role = state
        .store
        .update_role(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(role))
}

/// DELETE /api/v1/roles/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if state.store.delete_role(id).await? {
        tracing::info!(role_id = id, "Role deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/roles/{id}/permissions
pub async fn permissions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Vec<Permission>>> {
    let permissions = state
        .store
        .role_permissions(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(permissions))
}

/// POST /api/v1/roles/{id}/add_permission
pub async fn add_permission(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<RolePermissionRequest>, AppError>,
) -> AppResult<Json<StatusResponse>> {
    let relation = Relation::RolePermission;
    require_owner(&state, relation, id).await?;
    let ApiJson(input) = body?;
    let permission_id = require_target(relation, input.permission_id)?;

    let outcome = state.store.add_relation(relation, id, permission_id).await?;
    tracing::info!(role_id = id, permission_id, ?outcome, "Permission added to role");

    Ok(Json(StatusResponse {
        status: relation.added_status(),
    }))
}

/// POST /api/v1/roles/{id}/remove_permission
pub async fn remove_permission(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<RolePermissionRequest>, AppError>,
) -> AppResult<Json<StatusResponse>> {
    let relation = Relation::RolePermission;
    require_owner(&state, relation, id).await?;
    let ApiJson(input) = body?;
    let permission_id = require_target(relation, input.permission_id)?;

    state
        .store
        .remove_relation(relation, id, permission_id)
        .await?;
    tracing::info!(role_id = id, permission_id, "Permission removed from role");

    Ok(Json(StatusResponse {
        status: relation.removed_status(),
    }))
}
