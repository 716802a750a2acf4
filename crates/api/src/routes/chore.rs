//! Route definitions for the `/chores` resource, including dashboards.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{chore, dashboard};
use crate::state::AppState;

/// Routes mounted at `/chores`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /dashboard-data        -> admin_dashboard
/// GET    /user-dashboard-data   -> user_dashboard
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// PUT    /{id}/status           -> update_status
/// PUT    /{id}/todo             -> update_checklist
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(chore::list).post(chore::create))
        .route("/dashboard-data", get(dashboard::admin_dashboard))
        .route("/user-dashboard-data", get(dashboard::user_dashboard))
        .route(
            "/{id}",
            get(chore::get_by_id).put(chore::update).delete(chore::delete),
        )
        .route("/{id}/status", put(chore::update_status))
        .route("/{id}/todo", put(chore::update_checklist))
}
