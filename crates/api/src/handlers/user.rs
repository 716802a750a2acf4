//! Handlers for the `/users` resource.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use bitchore_core::access::{authorize, ChoreAction};
use bitchore_core::error::CoreError;
use bitchore_core::roles::Role;
use bitchore_core::types::DbId;
use bitchore_db::models::user::{UserChoreCounts, UserResponse, UserWithCounts};
use bitchore_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/users
///
/// Every member with their assigned chores counted per status. Admin only.
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<UserWithCounts>>> {
    authorize(&auth.actor(), ChoreAction::ListMembers, None)?;

    let members = UserRepo::list_by_role(&state.pool, Role::Member).await?;
    let ids: Vec<DbId> = members.iter().map(|u| u.id).collect();
    let counts: HashMap<DbId, UserChoreCounts> = UserRepo::chore_counts(&state.pool, &ids)
        .await?
        .into_iter()
        .map(|c| (c.user_id, c))
        .collect();

    let listing = members
        .iter()
        .map(|user| UserWithCounts {
            user: user.to_response(),
            counts: counts.get(&user.id).copied().unwrap_or_default(),
        })
        .collect();

    Ok(Json(listing))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.to_response()))
}
