//! Route definitions for the `/roles` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::role;
use crate::state::AppState;

/// Routes mounted at `/roles`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> replace
/// PATCH  /{id}                     -> update
/// DELETE /{id}                     -> delete
/// GET    /{id}/permissions         -> permissions
/// POST   /{id}/add_permission      -> add_permission
/// POST   /{id}/remove_permission   -> remove_permission
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(role::list).post(role::create))
        .route(
            "/{id}",
            get(role::get_by_id)
                .put(role::replace)
                .patch(role::update)
                .delete(role::delete),
        )
        .route("/{id}/permissions", get(role::permissions))
        .route("/{id}/add_permission", post(role::add_permission))
        .route("/{id}/remove_permission", post(role::remove_permission))
}
