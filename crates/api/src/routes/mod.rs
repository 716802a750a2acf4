pub mod auth;
pub mod chore;
pub mod health;
pub mod report;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/register                        register (public)
/// /auth/login                           login (public)
/// /auth/profile                         get, update (auth)
///
/// /chores                               list, create
/// /chores/dashboard-data                admin dashboard
/// /chores/user-dashboard-data           caller dashboard
/// /chores/{id}                          get, update, delete
/// /chores/{id}/status                   update status
/// /chores/{id}/todo                     replace checklist
///
/// /users                                list members (admin)
/// /users/{id}                           get
///
/// /reports/export/chores                chore report (admin)
/// /reports/export/users                 user report (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/chores", chore::router())
        .nest("/users", user::router())
        .nest("/reports", report::router())
}
