//! Chore entity and its status/progress rules.
//!
//! A chore's `status`, `progress` and per-item `completed` flags are kept
//! consistent by two entry points into one state machine:
//!
//! - [`Chore::set_status`] is the direct path. Setting `Completed` forces
//!   every checklist item complete and `progress` to 100; any other status
//!   leaves checklist and progress untouched.
//! - [`Chore::replace_checklist`] is the derived path. It recomputes
//!   `progress` from the checklist and derives `status` from it, overriding
//!   whatever the direct path set earlier.
//!
//! Neither path forbids any transition and there is no terminal state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Progress value of a fully completed chore.
pub const MAX_PROGRESS: i16 = 100;

/* --------------------------------------------------------------------------
Status and priority
-------------------------------------------------------------------------- */

/// Lifecycle status of a chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChoreStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl ChoreStatus {
    pub const ALL: [ChoreStatus; 3] = [
        ChoreStatus::Pending,
        ChoreStatus::InProgress,
        ChoreStatus::Completed,
    ];

    /// Stored and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ChoreStatus::Pending => "Pending",
            ChoreStatus::InProgress => "In Progress",
            ChoreStatus::Completed => "Completed",
        }
    }

    /// Three-way bucket: 0 is Pending, 100 is Completed, anything between is
    /// In Progress.
    pub fn from_progress(progress: i16) -> Self {
        if progress >= MAX_PROGRESS {
            ChoreStatus::Completed
        } else if progress > 0 {
            ChoreStatus::InProgress
        } else {
            ChoreStatus::Pending
        }
    }
}

impl fmt::Display for ChoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoreStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChoreStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status '{s}'. Must be one of: Pending, In Progress, Completed"
                ))
            })
    }
}

/// Priority of a chore. Defaults to `Medium` when a creator omits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChorePriority {
    Low,
    #[default]
    Medium,
    High,
}

impl ChorePriority {
    pub const ALL: [ChorePriority; 3] = [
        ChorePriority::Low,
        ChorePriority::Medium,
        ChorePriority::High,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChorePriority::Low => "Low",
            ChorePriority::Medium => "Medium",
            ChorePriority::High => "High",
        }
    }
}

impl fmt::Display for ChorePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChorePriority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChorePriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid priority '{s}'. Must be one of: Low, Medium, High"
                ))
            })
    }
}

/* --------------------------------------------------------------------------
Checklist
-------------------------------------------------------------------------- */

/// One `{text, completed}` entry of a chore's todo checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// Number of completed checklist items.
pub fn completed_count(items: &[ChecklistItem]) -> usize {
    items.iter().filter(|item| item.completed).count()
}

/// `round(100 * completed / total)`, rounding halves up; 0 for an empty list.
pub fn progress_for(items: &[ChecklistItem]) -> i16 {
    let total = items.len();
    if total == 0 {
        return 0;
    }
    let done = completed_count(items);
    // Integer form of floor(100 * done / total + 0.5).
    let pct = (200 * done + total) / (2 * total);
    i16::try_from(pct).unwrap_or(MAX_PROGRESS)
}

/* --------------------------------------------------------------------------
Assignment
-------------------------------------------------------------------------- */

/// Parse an `assignedTo` payload.
///
/// It must be a JSON array of integer user ids. Ids are not checked for
/// existence. Duplicates are dropped, keeping first-seen order.
pub fn parse_assignees(value: &serde_json::Value) -> Result<Vec<DbId>, CoreError> {
    let items = value.as_array().ok_or_else(|| {
        CoreError::Validation("assignedTo must be an array of user IDs".to_string())
    })?;

    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        let id = item.as_i64().ok_or_else(|| {
            CoreError::Validation(format!("assignedTo contains an invalid user ID: {item}"))
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/* --------------------------------------------------------------------------
Entity
-------------------------------------------------------------------------- */

/// A persisted chore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub priority: ChorePriority,
    pub status: ChoreStatus,
    pub progress: i16,
    pub due_date: Option<Timestamp>,
    pub assigned_to: Vec<DbId>,
    pub todo_checklist: Vec<ChecklistItem>,
    pub attachments: Vec<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Chore {
    pub fn is_assigned_to(&self, user_id: DbId) -> bool {
        self.assigned_to.contains(&user_id)
    }

    pub fn completed_todo_count(&self) -> usize {
        completed_count(&self.todo_checklist)
    }

    /// Direct status path.
    ///
    /// `Completed` marks every checklist item complete and sets progress to
    /// 100. Other statuses change nothing but the status itself.
    pub fn set_status(&mut self, status: ChoreStatus) {
        self.status = status;
        if status == ChoreStatus::Completed {
            for item in &mut self.todo_checklist {
                item.completed = true;
            }
            self.progress = MAX_PROGRESS;
        }
    }

    /// Derived status path.
    ///
    /// Replaces the checklist wholesale, recomputes progress and buckets the
    /// status from it.
    pub fn replace_checklist(&mut self, items: Vec<ChecklistItem>) {
        self.todo_checklist = items;
        self.progress = progress_for(&self.todo_checklist);
        self.status = ChoreStatus::from_progress(self.progress);
    }

    /// Apply the keys present in `patch`.
    ///
    /// Blank `title`/`description` values are ignored because both fields
    /// are required. Every other present key is applied as given, so
    /// `due_date: Some(None)` clears the due date and an empty list clears
    /// attachments, checklist or assignees. Progress and status are left
    /// as they were.
    pub fn apply_patch(&mut self, patch: ChorePatch) {
        if let Some(title) = patch.title.filter(|t| !t.trim().is_empty()) {
            self.title = title;
        }
        if let Some(description) = patch.description.filter(|d| !d.trim().is_empty()) {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(assigned_to) = patch.assigned_to {
            self.assigned_to = assigned_to;
        }
        if let Some(todo_checklist) = patch.todo_checklist {
            self.todo_checklist = todo_checklist;
        }
        if let Some(attachments) = patch.attachments {
            self.attachments = attachments;
        }
    }
}

/// Explicit field set for a partial chore update. `None` means "absent".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChorePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<ChorePriority>,
    /// Outer `None` keeps the due date, `Some(None)` clears it.
    pub due_date: Option<Option<Timestamp>>,
    pub assigned_to: Option<Vec<DbId>>,
    pub todo_checklist: Option<Vec<ChecklistItem>>,
    pub attachments: Option<Vec<String>>,
}

/// A chore about to be inserted.
///
/// Built only through [`NewChore::new`], which fixes the creation defaults:
/// status `Pending` and progress 0 whatever the checklist holds.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChore {
    pub title: String,
    pub description: String,
    pub priority: ChorePriority,
    pub status: ChoreStatus,
    pub progress: i16,
    pub due_date: Option<Timestamp>,
    pub assigned_to: Vec<DbId>,
    pub todo_checklist: Vec<ChecklistItem>,
    pub attachments: Vec<String>,
    pub created_by: DbId,
}

/// Caller-supplied fields for [`NewChore::new`].
#[derive(Debug, Clone, Default)]
pub struct ChoreFields {
    pub title: String,
    pub description: String,
    pub priority: Option<ChorePriority>,
    pub due_date: Option<Timestamp>,
    pub assigned_to: Vec<DbId>,
    pub todo_checklist: Vec<ChecklistItem>,
    pub attachments: Vec<String>,
}

impl NewChore {
    pub fn new(created_by: DbId, fields: ChoreFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            priority: fields.priority.unwrap_or_default(),
            status: ChoreStatus::Pending,
            progress: 0,
            due_date: fields.due_date,
            assigned_to: fields.assigned_to,
            todo_checklist: fields.todo_checklist,
            attachments: fields.attachments,
            created_by,
        }
    }
}

/// Validate the free-text fields required at creation.
pub fn validate_required_text(title: &str, description: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    if description.trim().is_empty() {
        return Err(CoreError::Validation("Description is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn item(text: &str, completed: bool) -> ChecklistItem {
        ChecklistItem {
            text: text.to_string(),
            completed,
        }
    }

    fn sample_chore(checklist: Vec<ChecklistItem>) -> Chore {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        Chore {
            id: 1,
            title: "Weekly groceries".to_string(),
            description: "Restock the fridge".to_string(),
            priority: ChorePriority::Medium,
            status: ChoreStatus::Pending,
            progress: 0,
            due_date: None,
            assigned_to: vec![7],
            todo_checklist: checklist,
            attachments: Vec::new(),
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    // -- progress --------------------------------------------------------

    #[test]
    fn empty_checklist_has_zero_progress() {
        assert_eq!(progress_for(&[]), 0);
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        let one_of_three = vec![item("a", true), item("b", false), item("c", false)];
        assert_eq!(progress_for(&one_of_three), 33);

        let two_of_three = vec![item("a", true), item("b", true), item("c", false)];
        assert_eq!(progress_for(&two_of_three), 67);
    }

    #[test]
    fn progress_rounds_halves_up() {
        let mut items: Vec<ChecklistItem> = (0..8).map(|i| item(&i.to_string(), false)).collect();
        items[0].completed = true;
        // 12.5 -> 13
        assert_eq!(progress_for(&items), 13);
    }

    #[test]
    fn progress_matches_formula_for_small_lists() {
        for total in 1..=20usize {
            for done in 0..=total {
                let items: Vec<ChecklistItem> =
                    (0..total).map(|i| item("x", i < done)).collect();
                let expected = (100.0 * done as f64 / total as f64).round() as i16;
                assert_eq!(progress_for(&items), expected, "{done}/{total}");
            }
        }
    }

    // -- status bucket ---------------------------------------------------

    #[test]
    fn status_buckets_follow_progress() {
        assert_eq!(ChoreStatus::from_progress(0), ChoreStatus::Pending);
        assert_eq!(ChoreStatus::from_progress(1), ChoreStatus::InProgress);
        assert_eq!(ChoreStatus::from_progress(99), ChoreStatus::InProgress);
        assert_eq!(ChoreStatus::from_progress(100), ChoreStatus::Completed);
    }

    #[test]
    fn status_parses_wire_names() {
        assert_eq!("In Progress".parse::<ChoreStatus>().unwrap(), ChoreStatus::InProgress);
        assert_matches!("pending".parse::<ChoreStatus>(), Err(CoreError::Validation(_)));
        assert_matches!("".parse::<ChoreStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn status_serializes_with_space() {
        assert_eq!(
            serde_json::to_value(ChoreStatus::InProgress).unwrap(),
            json!("In Progress")
        );
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(ChorePriority::default(), ChorePriority::Medium);
        assert_matches!("Urgent".parse::<ChorePriority>(), Err(CoreError::Validation(_)));
    }

    // -- checklist path --------------------------------------------------

    #[test]
    fn replace_checklist_derives_progress_and_status() {
        let mut chore = sample_chore(vec![item("a", false), item("b", false)]);

        chore.replace_checklist(vec![item("a", true), item("b", false)]);
        assert_eq!(chore.progress, 50);
        assert_eq!(chore.status, ChoreStatus::InProgress);

        chore.replace_checklist(vec![item("a", true), item("b", true)]);
        assert_eq!(chore.progress, 100);
        assert_eq!(chore.status, ChoreStatus::Completed);

        chore.replace_checklist(vec![item("a", false), item("b", false)]);
        assert_eq!(chore.progress, 0);
        assert_eq!(chore.status, ChoreStatus::Pending);
    }

    #[test]
    fn replace_checklist_with_empty_list_resets_to_pending() {
        let mut chore = sample_chore(vec![item("a", true)]);
        chore.set_status(ChoreStatus::Completed);

        chore.replace_checklist(Vec::new());
        assert_eq!(chore.progress, 0);
        assert_eq!(chore.status, ChoreStatus::Pending);
    }

    #[test]
    fn checklist_path_overrides_forced_status() {
        let mut chore = sample_chore(vec![item("a", false), item("b", false)]);
        chore.status = ChoreStatus::Completed;
        chore.progress = 40;

        chore.replace_checklist(vec![item("a", true), item("b", false)]);
        assert_eq!(chore.status, ChoreStatus::InProgress);
        assert_eq!(chore.progress, 50);
    }

    // -- status path -----------------------------------------------------

    #[test]
    fn completing_forces_checklist_and_progress() {
        let mut chore = sample_chore(vec![item("a", false), item("b", true), item("c", false)]);

        chore.set_status(ChoreStatus::Completed);
        assert!(chore.todo_checklist.iter().all(|i| i.completed));
        assert_eq!(chore.progress, 100);
    }

    #[test]
    fn non_completed_status_leaves_progress_alone() {
        let mut chore = sample_chore(vec![item("a", true), item("b", false)]);
        chore.replace_checklist(chore.todo_checklist.clone());
        let before = chore.todo_checklist.clone();

        chore.set_status(ChoreStatus::Pending);
        assert_eq!(chore.status, ChoreStatus::Pending);
        assert_eq!(chore.progress, 50);
        assert_eq!(chore.todo_checklist, before);
    }

    #[test]
    fn set_status_is_idempotent() {
        for status in ChoreStatus::ALL {
            let mut once = sample_chore(vec![item("a", false), item("b", true)]);
            once.set_status(status);
            let mut twice = once.clone();
            twice.set_status(status);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn buy_milk_wash_car_scenario() {
        let mut chore = sample_chore(vec![ChecklistItem::new("Buy milk"), ChecklistItem::new("Wash car")]);

        chore.replace_checklist(vec![item("Buy milk", true), item("Wash car", false)]);
        assert_eq!(chore.progress, 50);
        assert_eq!(chore.status, ChoreStatus::InProgress);

        chore.replace_checklist(vec![item("Buy milk", true), item("Wash car", true)]);
        assert_eq!(chore.progress, 100);
        assert_eq!(chore.status, ChoreStatus::Completed);

        chore.set_status(ChoreStatus::Pending);
        assert_eq!(chore.status, ChoreStatus::Pending);
        assert_eq!(chore.progress, 100);
        assert!(chore.todo_checklist.iter().all(|i| i.completed));
    }

    // -- patch path ------------------------------------------------------

    #[test]
    fn blank_title_is_ignored() {
        let mut chore = sample_chore(Vec::new());
        chore.apply_patch(ChorePatch {
            title: Some(String::new()),
            description: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(chore.title, "Weekly groceries");
        assert_eq!(chore.description, "Restock the fridge");
    }

    #[test]
    fn absent_keys_are_untouched() {
        let mut chore = sample_chore(vec![item("a", true)]);
        chore.attachments = vec!["https://example.com/list.png".to_string()];
        let before = chore.clone();

        chore.apply_patch(ChorePatch::default());
        assert_eq!(chore, before);
    }

    #[test]
    fn present_empty_values_clear_optional_fields() {
        let mut chore = sample_chore(vec![item("a", true)]);
        chore.due_date = Some(chore.created_at + Duration::days(3));
        chore.attachments = vec!["https://example.com/list.png".to_string()];

        chore.apply_patch(ChorePatch {
            due_date: Some(None),
            attachments: Some(Vec::new()),
            assigned_to: Some(Vec::new()),
            ..Default::default()
        });
        assert_eq!(chore.due_date, None);
        assert!(chore.attachments.is_empty());
        assert!(chore.assigned_to.is_empty());
    }

    #[test]
    fn patch_checklist_does_not_rederive_status() {
        let mut chore = sample_chore(Vec::new());
        chore.apply_patch(ChorePatch {
            todo_checklist: Some(vec![item("a", true)]),
            priority: Some(ChorePriority::High),
            ..Default::default()
        });
        assert_eq!(chore.priority, ChorePriority::High);
        assert_eq!(chore.todo_checklist.len(), 1);
        assert_eq!(chore.progress, 0);
        assert_eq!(chore.status, ChoreStatus::Pending);
    }

    // -- creation --------------------------------------------------------

    #[test]
    fn new_chore_uses_explicit_defaults() {
        let chore = NewChore::new(
            3,
            ChoreFields {
                title: "Mow the lawn".to_string(),
                description: "Front and back".to_string(),
                todo_checklist: vec![item("front", true)],
                ..Default::default()
            },
        );
        assert_eq!(chore.status, ChoreStatus::Pending);
        assert_eq!(chore.progress, 0);
        assert_eq!(chore.priority, ChorePriority::Medium);
        assert_eq!(chore.created_by, 3);
    }

    #[test]
    fn required_text_must_not_be_blank() {
        assert!(validate_required_text("Dishes", "After dinner").is_ok());
        assert_matches!(validate_required_text(" ", "x"), Err(CoreError::Validation(_)));
        assert_matches!(validate_required_text("x", ""), Err(CoreError::Validation(_)));
    }

    // -- assignees -------------------------------------------------------

    #[test]
    fn assignees_must_be_an_array() {
        assert_matches!(parse_assignees(&json!(5)), Err(CoreError::Validation(_)));
        assert_matches!(parse_assignees(&json!("5")), Err(CoreError::Validation(_)));
        assert_matches!(parse_assignees(&json!({"id": 5})), Err(CoreError::Validation(_)));
    }

    #[test]
    fn assignees_reject_non_integer_entries() {
        assert_matches!(parse_assignees(&json!([1, "two"])), Err(CoreError::Validation(_)));
    }

    #[test]
    fn assignees_are_deduplicated_in_order() {
        assert_eq!(parse_assignees(&json!([4, 2, 4, 9])).unwrap(), vec![4, 2, 9]);
        assert!(parse_assignees(&json!([])).unwrap().is_empty());
    }
}
