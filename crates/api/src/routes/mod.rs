pub mod auth;
pub mod dreams;
pub mod health;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register                          register (public)
/// /login                             login (public)
/// /logout                            logout
/// /user                              current user (requires auth)
///
/// /dreams                            list, create
/// /dreams/{id}                       get, update (PATCH), delete
/// /dreams/{id}/tasks                 list (ordered), create
/// /dreams/{id}/resources             list, create
/// /dreams/{id}/vision-items          list, create
///
/// /tasks/{id}                        update (PATCH), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/dreams", dreams::router())
        .nest("/tasks", tasks::router())
}
