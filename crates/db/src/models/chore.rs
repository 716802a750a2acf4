//! Chore row models and their conversion into core types.
//!
//! `priority` and `status` are stored as text guarded by CHECK constraints;
//! conversion parses them back into the core enums.

use bitchore_core::chore::{ChecklistItem, Chore};
use bitchore_core::dashboard::{GroupCount, RecentChore};
use bitchore_core::error::CoreError;
use bitchore_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// Full row from the `chores` table.
#[derive(Debug, Clone, FromRow)]
pub struct ChoreRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub progress: i16,
    pub due_date: Option<Timestamp>,
    pub assigned_to: Vec<DbId>,
    pub todo_checklist: Json<Vec<ChecklistItem>>,
    pub attachments: Vec<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ChoreRow> for Chore {
    type Error = CoreError;

    fn try_from(row: ChoreRow) -> Result<Self, Self::Error> {
        Ok(Chore {
            id: row.id,
            title: row.title,
            description: row.description,
            priority: row.priority.parse()?,
            status: row.status.parse()?,
            progress: row.progress,
            due_date: row.due_date,
            assigned_to: row.assigned_to,
            todo_checklist: row.todo_checklist.0,
            attachments: row.attachments,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Projection used by the dashboard's recent-chores list.
#[derive(Debug, Clone, FromRow)]
pub struct RecentChoreRow {
    pub id: DbId,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl TryFrom<RecentChoreRow> for RecentChore {
    type Error = CoreError;

    fn try_from(row: RecentChoreRow) -> Result<Self, Self::Error> {
        Ok(RecentChore {
            id: row.id,
            title: row.title,
            status: row.status.parse()?,
            priority: row.priority.parse()?,
            due_date: row.due_date,
            created_at: row.created_at,
        })
    }
}

/// One `GROUP BY` bucket.
#[derive(Debug, Clone, FromRow)]
pub struct GroupCountRow {
    pub key: String,
    pub count: i64,
}

impl From<GroupCountRow> for GroupCount {
    fn from(row: GroupCountRow) -> Self {
        GroupCount::new(row.key, row.count)
    }
}

/// Convert a decoded row, reporting a bad enum value as a decode error.
pub(crate) fn decode<R, T>(row: R) -> Result<T, sqlx::Error>
where
    T: TryFrom<R, Error = CoreError>,
{
    T::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
