//! Route definitions for the person resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::person;
use crate::state::AppState;

/// Routes mounted at `/users` and again at `/persons`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> replace
/// PATCH  /{id}                -> update
/// DELETE /{id}                -> delete
/// GET    /{id}/permissions    -> permissions
/// POST   /{id}/add_role       -> add_role
/// POST   /{id}/remove_role    -> remove_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(person::list).post(person::create))
        .route(
            "/{id}",
            get(person::get_by_id)
                .put(person::replace)
                .patch(person::update)
                .delete(person::delete),
        )
        .route("/{id}/permissions", get(person::permissions))
        .route("/{id}/add_role", post(person::add_role))
        .route("/{id}/remove_role", post(person::remove_role))
}
