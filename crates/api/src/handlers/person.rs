//! Handlers for the `/users` resource (also mounted at `/persons`) and its
//! role actions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use warden_core::error::CoreError;
use warden_core::password::hash_password;
use warden_core::relations::Relation;
use warden_core::types::DbId;
use warden_core::validation::validate_input;
use warden_db::models::permission::Permission;
use warden_db::models::person::{
    CreatePerson, NewPerson, PersonChanges, PersonDetail, PersonRoleRequest, UpdatePerson,
};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::handlers::{require_owner, require_target};
use crate::response::StatusResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Person",
        id,
    })
}

async fn require_person(state: &AppState, id: DbId) -> AppResult<PersonDetail> {
    state
        .store
        .find_person(id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Hash a write-only password field, if one was supplied.
fn hash_optional(password: Option<&str>) -> AppResult<Option<String>> {
    password
        .map(|plain| {
            hash_password(plain)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
        })
        .transpose()
}

/// POST /api/v1/users
///
/// A `roles` array in the body is ignored.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePerson>,
) -> AppResult<(StatusCode, Json<PersonDetail>)> {
    validate_input(&input)?;

    let new_person = NewPerson {
        password_hash: hash_optional(input.password.as_deref())?,
        name: input.name,
        email: input.email,
    };

    let person = state.store.create_person(&new_person).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// GET /api/v1/users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<PersonDetail>>> {
    let persons = state.store.list_persons().await?;
    Ok(Json(persons))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<PersonDetail>> {
    let person = require_person(&state, id).await?;
    Ok(Json(person))
}

/// PUT /api/v1/users/{id}
///
/// Omitting `password` keeps the stored one.
pub async fn replace(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<CreatePerson>, AppError>,
) -> AppResult<Json<PersonDetail>> {
    require_person(&state, id).await?;
    let ApiJson(input) = body?;
    validate_input(&input)?;
    apply_update(&state, id, input.into()).await
}

/// PATCH /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<UpdatePerson>, AppError>,
) -> AppResult<Json<PersonDetail>> {
    require_person(&state, id).await?;
    let ApiJson(input) = body?;
    validate_input(&input)?;
    apply_update(&state, id, input).await
}

async fn apply_update(
    state: &AppState,
    id: DbId,
    input: UpdatePerson,
) -> AppResult<Json<PersonDetail>> {
    let changes = PersonChanges {
        password_hash: hash_optional(input.password.as_deref())?,
        name: input.name,
        email: input.email,
    };

    let person = state
        .store
        .update_person(id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(person))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if state.store.delete_person(id).await? {
        tracing::info!(person_id = id, "Person deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/users/{id}/permissions
///
/// Distinct union of the permissions of every role the person holds.
pub async fn permissions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Vec<Permission>>> {
    let permissions = state
        .store
        .person_permissions(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(permissions))
}

/// POST /api/v1/users/{id}/add_role
pub async fn add_role(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<PersonRoleRequest>, AppError>,
) -> AppResult<Json<StatusResponse>> {
    let relation = Relation::PersonRole;
    require_owner(&state, relation, id).await?;
    let ApiJson(input) = body?;
    let role_id = require_target(relation, input.role_id)?;

    let outcome = state.store.add_relation(relation, id, role_id).await?;
    tracing::info!(person_id = id, role_id, ?outcome, "Role added to person");

    Ok(Json(StatusResponse {
        status: relation.added_status(),
    }))
}

/// POST /api/v1/users/{id}/remove_role
pub async fn remove_role(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    body: Result<ApiJson<PersonRoleRequest>, AppError>,
) -> AppResult<Json<StatusResponse>> {
    let relation = Relation::PersonRole;
    require_owner(&state, relation, id).await?;
    let ApiJson(input) = body?;
    let role_id = require_target(relation, input.role_id)?;

    state.store.remove_relation(relation, id, role_id).await?;
    tracing::info!(person_id = id, role_id, "Role removed from person");

    Ok(Json(StatusResponse {
        status: relation.removed_status(),
    }))
}
