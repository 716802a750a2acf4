//! Handlers for the `/chores` resource.
//!
//! Each handler resolves the caller, loads the chore when the action targets
//! one, and asks [`authorize`] once before touching anything else.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bitchore_core::access::{authorize, ChoreAction};
use bitchore_core::chore::{
    parse_assignees, validate_required_text, ChecklistItem, Chore, ChoreFields, ChorePatch,
    ChorePriority, ChoreStatus, NewChore,
};
use bitchore_core::dashboard::StatusSummary;
use bitchore_core::error::CoreError;
use bitchore_core::types::{DbId, Timestamp};
use bitchore_db::models::user::UserProfile;
use bitchore_db::repositories::{ChoreRepo, DashboardRepo, UserRepo};
use bitchore_db::DbPool;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::MessageResponse;
use crate::middleware::auth::AuthUser;
use crate::query::ChoreListParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /chores`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChoreRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Option<String>,
    pub due_date: Option<Timestamp>,
    /// Kept as raw JSON so a non-array is a validation error, not a parse error.
    #[serde(default)]
    pub assigned_to: serde_json::Value,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub todo_checklist: Vec<ChecklistItem>,
}

impl CreateChoreRequest {
    fn into_fields(self) -> Result<ChoreFields, CoreError> {
        validate_required_text(&self.title, &self.description)?;
        Ok(ChoreFields {
            assigned_to: parse_assignees(&self.assigned_to)?,
            priority: parse_priority(self.priority.as_deref())?,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            todo_checklist: self.todo_checklist,
            attachments: self.attachments,
        })
    }
}

/// Request body for `PUT /chores/{id}`. Only keys present in the body apply.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChoreRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    /// `null` clears the due date; an absent key keeps it.
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "present")]
    pub assigned_to: Option<serde_json::Value>,
    pub attachments: Option<Vec<String>>,
    pub todo_checklist: Option<Vec<ChecklistItem>>,
}

impl UpdateChoreRequest {
    fn into_patch(self) -> Result<ChorePatch, CoreError> {
        Ok(ChorePatch {
            assigned_to: self.assigned_to.as_ref().map(parse_assignees).transpose()?,
            priority: parse_priority(self.priority.as_deref())?,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            todo_checklist: self.todo_checklist,
            attachments: self.attachments,
        })
    }
}

/// Request body for `PUT /chores/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Request body for `PUT /chores/{id}/todo`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChecklistRequest {
    pub todo_checklist: Option<Vec<ChecklistItem>>,
}

/// Wraps a present key in `Some`, so `null` and "absent" stay distinct.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn parse_priority(raw: Option<&str>) -> Result<Option<ChorePriority>, CoreError> {
    raw.map(str::parse).transpose()
}

/// Empty filter values mean "no filter".
fn parse_status_filter(raw: Option<&str>) -> Result<Option<ChoreStatus>, CoreError> {
    raw.filter(|s| !s.is_empty()).map(str::parse).transpose()
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// `{ "message": ..., "chore": ... }` returned by mutations.
#[derive(Debug, Serialize)]
pub struct ChoreMessage {
    pub message: &'static str,
    pub chore: Chore,
}

/// A chore with its assignees resolved to user profiles.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreView {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub priority: ChorePriority,
    pub status: ChoreStatus,
    pub progress: i16,
    pub due_date: Option<Timestamp>,
    pub assigned_to: Vec<UserProfile>,
    pub todo_checklist: Vec<ChecklistItem>,
    pub completed_todo_count: usize,
    pub attachments: Vec<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChoreView {
    /// Assignees missing from `profiles` (deleted users) are dropped.
    pub fn new(chore: Chore, profiles: &HashMap<DbId, UserProfile>) -> Self {
        let completed_todo_count = chore.completed_todo_count();
        let assigned_to = chore
            .assigned_to
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect();
        Self {
            id: chore.id,
            title: chore.title,
            description: chore.description,
            priority: chore.priority,
            status: chore.status,
            progress: chore.progress,
            due_date: chore.due_date,
            assigned_to,
            todo_checklist: chore.todo_checklist,
            completed_todo_count,
            attachments: chore.attachments,
            created_by: chore.created_by,
            created_at: chore.created_at,
            updated_at: chore.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreListResponse {
    pub chores: Vec<ChoreView>,
    pub status_summary: StatusSummary,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/chores
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateChoreRequest>,
) -> AppResult<(StatusCode, Json<ChoreMessage>)> {
    authorize(&auth.actor(), ChoreAction::Create, None)?;

    let fields = input.into_fields()?;
    let chore = ChoreRepo::create(&state.pool, &NewChore::new(auth.user_id, fields)).await?;

    tracing::info!(user_id = auth.user_id, chore_id = chore.id, "Chore created");

    Ok((
        StatusCode::CREATED,
        Json(ChoreMessage {
            message: "Chore created successfully",
            chore,
        }),
    ))
}

/// GET /api/chores?status=
///
/// Admins see every chore, members only the ones assigned to them. The
/// status summary covers the same scope and ignores the status filter.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ChoreListParams>,
) -> AppResult<Json<ChoreListResponse>> {
    let status = parse_status_filter(params.status.as_deref())?;
    let scope = auth.actor().chore_scope();

    let chores = ChoreRepo::list(&state.pool, scope, status).await?;
    let total = DashboardRepo::total(&state.pool, scope).await?;
    let groups = DashboardRepo::status_groups(&state.pool, scope).await?;

    let profiles = load_profiles(&state.pool, &chores).await?;
    let chores = chores
        .into_iter()
        .map(|chore| ChoreView::new(chore, &profiles))
        .collect();

    Ok(Json(ChoreListResponse {
        chores,
        status_summary: StatusSummary::from_groups(&groups, total),
    }))
}

/// GET /api/chores/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ChoreView>> {
    let chore = find_chore(&state.pool, id).await?;
    authorize(&auth.actor(), ChoreAction::View, Some(&chore))?;

    let profiles = load_profiles(&state.pool, std::slice::from_ref(&chore)).await?;
    Ok(Json(ChoreView::new(chore, &profiles)))
}

/// PUT /api/chores/{id}
///
/// Field edits never re-derive progress or status. Assignees may edit
/// everything except `assignedTo`.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateChoreRequest>,
) -> AppResult<Json<ChoreMessage>> {
    let mut chore = find_chore(&state.pool, id).await?;
    let actor = auth.actor();
    authorize(&actor, ChoreAction::EditFields, Some(&chore))?;

    let patch = input.into_patch()?;
    if patch.assigned_to.is_some() {
        authorize(&actor, ChoreAction::Reassign, Some(&chore))?;
    }
    chore.apply_patch(patch);
    let chore = save_chore(&state.pool, &chore).await?;

    tracing::info!(user_id = auth.user_id, chore_id = id, "Chore updated");

    Ok(Json(ChoreMessage {
        message: "Chore updated successfully",
        chore,
    }))
}

/// DELETE /api/chores/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    authorize(&auth.actor(), ChoreAction::Delete, None)?;

    if !ChoreRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Chore",
            id,
        }));
    }

    tracing::info!(user_id = auth.user_id, chore_id = id, "Chore deleted");

    Ok(Json(MessageResponse {
        message: "Chore deleted successfully",
    }))
}

/// PUT /api/chores/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateStatusRequest>,
) -> AppResult<Json<ChoreMessage>> {
    let mut chore = find_chore(&state.pool, id).await?;
    authorize(&auth.actor(), ChoreAction::UpdateStatus, Some(&chore))?;

    let status: ChoreStatus = input.status.parse()?;
    chore.set_status(status);
    let chore = save_chore(&state.pool, &chore).await?;

    tracing::info!(
        user_id = auth.user_id,
        chore_id = id,
        status = %status,
        progress = chore.progress,
        "Chore status updated"
    );

    Ok(Json(ChoreMessage {
        message: "Chore status updated",
        chore,
    }))
}

/// PUT /api/chores/{id}/todo
///
/// Replaces the checklist and derives progress and status from it.
pub async fn update_checklist(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateChecklistRequest>,
) -> AppResult<Json<ChoreMessage>> {
    let mut chore = find_chore(&state.pool, id).await?;
    authorize(&auth.actor(), ChoreAction::UpdateChecklist, Some(&chore))?;

    let items = input.todo_checklist.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "todoChecklist must be an array".into(),
        ))
    })?;
    chore.replace_checklist(items);
    let chore = save_chore(&state.pool, &chore).await?;

    tracing::info!(
        user_id = auth.user_id,
        chore_id = id,
        status = %chore.status,
        progress = chore.progress,
        "Chore checklist updated"
    );

    Ok(Json(ChoreMessage {
        message: "Checklist updated",
        chore,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_chore(pool: &DbPool, id: DbId) -> AppResult<Chore> {
    ChoreRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chore",
            id,
        }))
}

/// A chore deleted between load and save reports as not found.
async fn save_chore(pool: &DbPool, chore: &Chore) -> AppResult<Chore> {
    ChoreRepo::save(pool, chore)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chore",
            id: chore.id,
        }))
}

/// Profiles of every user assigned to any of `chores`, keyed by id.
async fn load_profiles(
    pool: &DbPool,
    chores: &[Chore],
) -> AppResult<HashMap<DbId, UserProfile>> {
    let mut ids: Vec<DbId> = chores
        .iter()
        .flat_map(|c| c.assigned_to.iter().copied())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let users = UserRepo::find_many(pool, &ids).await?;
    Ok(users.iter().map(|u| (u.id, u.to_profile())).collect())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn update_from(value: serde_json::Value) -> UpdateChoreRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn null_due_date_differs_from_absent() {
        assert_eq!(update_from(json!({})).due_date, None);
        assert_eq!(update_from(json!({"dueDate": null})).due_date, Some(None));
        assert!(update_from(json!({"dueDate": "2026-03-07T18:00:00Z"}))
            .due_date
            .is_some_and(|d| d.is_some()));
    }

    #[test]
    fn update_rejects_non_array_assignees() {
        let patch = update_from(json!({"assignedTo": 5})).into_patch();
        assert_matches!(patch, Err(CoreError::Validation(_)));

        let patch = update_from(json!({"assignedTo": null})).into_patch();
        assert_matches!(patch, Err(CoreError::Validation(_)));

        let patch = update_from(json!({"assignedTo": []})).into_patch().unwrap();
        assert_eq!(patch.assigned_to, Some(Vec::new()));
    }

    #[test]
    fn update_rejects_unknown_priority() {
        let patch = update_from(json!({"priority": "Urgent"})).into_patch();
        assert_matches!(patch, Err(CoreError::Validation(_)));
    }

    #[test]
    fn create_requires_assignee_array() {
        let input: CreateChoreRequest =
            serde_json::from_value(json!({"title": "Dishes", "description": "Sink"})).unwrap();
        assert_matches!(input.into_fields(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn create_defaults_priority_and_collections() {
        let input: CreateChoreRequest = serde_json::from_value(json!({
            "title": "Dishes",
            "description": "Sink",
            "assignedTo": [3, 3, 4],
        }))
        .unwrap();
        let fields = input.into_fields().unwrap();
        assert_eq!(fields.assigned_to, vec![3, 4]);
        assert_eq!(fields.priority, None);
        assert!(fields.todo_checklist.is_empty());
        assert!(fields.attachments.is_empty());
    }

    #[test]
    fn empty_status_filter_means_all() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("In Progress")).unwrap(),
            Some(ChoreStatus::InProgress)
        );
        assert_matches!(parse_status_filter(Some("Done")), Err(CoreError::Validation(_)));
    }
}
