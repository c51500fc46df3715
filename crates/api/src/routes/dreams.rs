//! Route definitions for the `/dreams` resource and its children.

use axum::routing::get;
use axum::Router;

use crate::handlers::{dream, resource, task, vision_item};
use crate::state::AppState;

/// Routes mounted at `/dreams`.
///
/// ```text
/// GET    /                      -> dream::list
/// POST   /                      -> dream::create
/// GET    /{id}                  -> dream::get
/// PATCH  /{id}                  -> dream::update
/// DELETE /{id}                  -> dream::delete
/// GET    /{id}/tasks            -> task::list
/// POST   /{id}/tasks            -> task::create
/// GET    /{id}/resources        -> resource::list
/// POST   /{id}/resources        -> resource::create
/// GET    /{id}/vision-items     -> vision_item::list
/// POST   /{id}/vision-items     -> vision_item::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dream::list).post(dream::create))
        .route(
            "/{id}",
            get(dream::get).patch(dream::update).delete(dream::delete),
        )
        .route("/{id}/tasks", get(task::list).post(task::create))
        .route(
            "/{id}/resources",
            get(resource::list).post(resource::create),
        )
        .route(
            "/{id}/vision-items",
            get(vision_item::list).post(vision_item::create),
        )
}
