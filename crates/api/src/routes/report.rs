//! Route definitions for the `/reports` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET /export/chores  -> export_chores (admin)
/// GET /export/users   -> export_users (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export/chores", get(report::export_chores))
        .route("/export/users", get(report::export_users))
}
