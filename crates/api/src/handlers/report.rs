//! Spreadsheet and CSV exports. Admin only.

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bitchore_core::access::{authorize, ChoreAction};
use bitchore_core::report::{Person, ReportTable};
use bitchore_core::types::DbId;
use bitchore_db::repositories::{ChoreRepo, UserRepo};

use crate::error::AppResult;
use crate::export::{self, ReportFormat};
use crate::middleware::auth::AuthUser;
use crate::query::ReportParams;
use crate::state::AppState;

/// GET /api/reports/export/chores?format=xlsx|csv
pub async fn export_chores(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ReportParams>,
) -> AppResult<Response> {
    authorize(&auth.actor(), ChoreAction::ExportReports, None)?;
    let format = ReportFormat::parse(params.format.as_deref())?;

    let chores = ChoreRepo::list(&state.pool, None, None).await?;
    let mut ids: Vec<DbId> = chores.iter().flat_map(|c| c.assigned_to.clone()).collect();
    ids.sort_unstable();
    ids.dedup();
    let people: Vec<Person> = UserRepo::find_many(&state.pool, &ids)
        .await?
        .iter()
        .map(|u| u.to_person())
        .collect();

    let table = ReportTable::chores(&chores, &people);
    tracing::info!(user_id = auth.user_id, rows = table.rows.len(), "Exporting chore report");
    download(&table, format)
}

/// GET /api/reports/export/users?format=xlsx|csv
///
/// One row per registered user, admins included.
pub async fn export_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ReportParams>,
) -> AppResult<Response> {
    authorize(&auth.actor(), ChoreAction::ExportReports, None)?;
    let format = ReportFormat::parse(params.format.as_deref())?;

    let people: Vec<Person> = UserRepo::list(&state.pool)
        .await?
        .iter()
        .map(|u| u.to_person())
        .collect();
    let chores = ChoreRepo::list(&state.pool, None, None).await?;

    let table = ReportTable::users(&people, &chores);
    tracing::info!(user_id = auth.user_id, rows = table.rows.len(), "Exporting user report");
    download(&table, format)
}

fn download(table: &ReportTable, format: ReportFormat) -> AppResult<Response> {
    let body = export::render(table, format)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::file_name(table, format)
    );

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
