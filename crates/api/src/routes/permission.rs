//! Route definitions for the `/permissions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::permission;
use crate::state::AppState;

/// Routes mounted at `/permissions`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> replace
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(permission::list).post(permission::create))
        .route(
            "/{id}",
            get(permission::get_by_id)
                .put(permission::replace)
                .patch(permission::update)
                .delete(permission::delete),
        )
}
