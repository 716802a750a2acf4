//! Dashboard summaries.
//!
//! Both endpoints return the same [`DashboardSummary`] shape; they differ
//! only in scope.

use axum::extract::State;
use axum::Json;
use bitchore_core::access::{authorize, ChoreAction};
use bitchore_core::dashboard::{DashboardSummary, RECENT_CHORES_LIMIT};
use bitchore_core::types::DbId;
use bitchore_db::repositories::DashboardRepo;
use bitchore_db::DbPool;
use chrono::Utc;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/chores/dashboard-data
///
/// Household-wide figures. Admin only.
pub async fn admin_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DashboardSummary>> {
    authorize(&auth.actor(), ChoreAction::ViewGlobalDashboard, None)?;
    Ok(Json(summarize(&state.pool, None).await?))
}

/// GET /api/chores/user-dashboard-data
///
/// Figures for chores assigned to the caller, admins included.
pub async fn user_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DashboardSummary>> {
    Ok(Json(summarize(&state.pool, Some(auth.user_id)).await?))
}

async fn summarize(pool: &DbPool, assignee: Option<DbId>) -> AppResult<DashboardSummary> {
    let counts = DashboardRepo::counts(pool, assignee, Utc::now()).await?;
    let recent = DashboardRepo::recent(pool, assignee, RECENT_CHORES_LIMIT).await?;
    Ok(DashboardSummary::assemble(&counts, recent))
}
