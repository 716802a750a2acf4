//! Tabular report flattening.
//!
//! Builds format-neutral [`ReportTable`]s from chores and users. The API
//! crate renders them as spreadsheets or CSV.

use std::collections::HashMap;

use crate::chore::{Chore, ChoreStatus};
use crate::types::{DbId, Timestamp};

/// Cell value of a report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCell {
    Text(String),
    Number(i64),
}

impl ReportCell {
    /// Plain-text rendering, used by CSV output.
    pub fn to_text(&self) -> String {
        match self {
            ReportCell::Text(s) => s.clone(),
            ReportCell::Number(n) => n.to_string(),
        }
    }
}

/// A named column with its display width (in spreadsheet character units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportColumn {
    pub header: &'static str,
    pub width: f64,
}

const fn column(header: &'static str, width: f64) -> ReportColumn {
    ReportColumn { header, width }
}

pub static CHORE_REPORT_COLUMNS: [ReportColumn; 7] = [
    column("Chore ID", 25.0),
    column("Title", 30.0),
    column("Description", 50.0),
    column("Priority", 15.0),
    column("Status", 20.0),
    column("Due Date", 20.0),
    column("Assigned To", 30.0),
];

pub static USER_REPORT_COLUMNS: [ReportColumn; 6] = [
    column("User Name", 30.0),
    column("Email", 40.0),
    column("Total Assigned Chores", 20.0),
    column("Pending Chores", 20.0),
    column("In Progress Chores", 20.0),
    column("Completed Chores", 20.0),
];

/// Minimal user projection needed by reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// A finished report: sheet name, download file stem, columns and rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub sheet_name: &'static str,
    pub file_stem: &'static str,
    pub columns: &'static [ReportColumn],
    pub rows: Vec<Vec<ReportCell>>,
}

/// `YYYY-MM-DD`, or an empty string when there is no due date.
pub fn format_due_date(due_date: Option<Timestamp>) -> String {
    due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// `Name (email)` for each known assignee joined by `, `, or `Unassigned`.
///
/// Ids with no matching user are skipped.
pub fn format_assignees(assigned_to: &[DbId], people: &HashMap<DbId, &Person>) -> String {
    let names: Vec<String> = assigned_to
        .iter()
        .filter_map(|id| people.get(id))
        .map(|p| format!("{} ({})", p.name, p.email))
        .collect();
    if names.is_empty() {
        "Unassigned".to_string()
    } else {
        names.join(", ")
    }
}

impl ReportTable {
    /// One row per chore.
    pub fn chores(chores: &[Chore], people: &[Person]) -> Self {
        let by_id: HashMap<DbId, &Person> = people.iter().map(|p| (p.id, p)).collect();
        let rows = chores
            .iter()
            .map(|chore| {
                vec![
                    ReportCell::Number(chore.id),
                    ReportCell::Text(chore.title.clone()),
                    ReportCell::Text(chore.description.clone()),
                    ReportCell::Text(chore.priority.as_str().to_string()),
                    ReportCell::Text(chore.status.as_str().to_string()),
                    ReportCell::Text(format_due_date(chore.due_date)),
                    ReportCell::Text(format_assignees(&chore.assigned_to, &by_id)),
                ]
            })
            .collect();

        Self {
            sheet_name: "Chores Report",
            file_stem: "chore_report",
            columns: &CHORE_REPORT_COLUMNS,
            rows,
        }
    }

    /// One row per user with per-status counts of the chores assigned to
    /// them, in the order `people` is given.
    pub fn users(people: &[Person], chores: &[Chore]) -> Self {
        let tallies = tally_assignments(people, chores);
        let rows = people
            .iter()
            .map(|person| {
                let tally = tallies.get(&person.id).copied().unwrap_or_default();
                vec![
                    ReportCell::Text(person.name.clone()),
                    ReportCell::Text(person.email.clone()),
                    ReportCell::Number(tally.total),
                    ReportCell::Number(tally.pending),
                    ReportCell::Number(tally.in_progress),
                    ReportCell::Number(tally.completed),
                ]
            })
            .collect();

        Self {
            sheet_name: "User Chore Report",
            file_stem: "users_report",
            columns: &USER_REPORT_COLUMNS,
            rows,
        }
    }
}

/// Per-user assignment counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentTally {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
}

/// Count, for every known person, the chores assigned to them by status.
/// Assignees that are not in `people` are ignored.
pub fn tally_assignments(people: &[Person], chores: &[Chore]) -> HashMap<DbId, AssignmentTally> {
    let mut tallies: HashMap<DbId, AssignmentTally> =
        people.iter().map(|p| (p.id, AssignmentTally::default())).collect();

    for chore in chores {
        for user_id in &chore.assigned_to {
            let Some(tally) = tallies.get_mut(user_id) else {
                continue;
            };
            tally.total += 1;
            match chore.status {
                ChoreStatus::Pending => tally.pending += 1,
                ChoreStatus::InProgress => tally.in_progress += 1,
                ChoreStatus::Completed => tally.completed += 1,
            }
        }
    }
    tallies
}
