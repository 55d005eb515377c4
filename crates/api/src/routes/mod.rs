pub mod health;
pub mod permission;
pub mod person;
pub mod role;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /permissions                          list, create
/// /permissions/{id}                     get, replace, update, delete
///
/// /roles                                list, create
/// /roles/{id}                           get, replace, update, delete
/// /roles/{id}/permissions               effective permissions
/// /roles/{id}/add_permission            attach permission (POST)
/// /roles/{id}/remove_permission         detach permission (POST)
///
/// /users                                list, create
/// /users/{id}                           get, replace, update, delete
/// /users/{id}/permissions               effective permissions
/// /users/{id}/add_role                  attach role (POST)
/// /users/{id}/remove_role               detach role (POST)
///
/// /persons/...                          alias of /users/...
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/permissions", permission::router())
        .nest("/roles", role::router())
        .nest("/users", person::router())
        .nest("/persons", person::router())
}
