//! Repository for the `chores` table.
//!
//! Mutations are whole-row read-modify-write: callers load a chore, change
//! it through the core entity methods and hand it back to [`ChoreRepo::save`].
//! There is no version check, so concurrent saves of the same chore are
//! last-write-wins.

use bitchore_core::chore::{Chore, ChoreStatus, NewChore};
use bitchore_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::chore::{decode, ChoreRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, priority, status, progress, due_date, \
                       assigned_to, todo_checklist, attachments, created_by, created_at, updated_at";

/// Provides CRUD operations for chores.
pub struct ChoreRepo;

impl ChoreRepo {
    /// Insert a new chore, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewChore) -> Result<Chore, sqlx::Error> {
        let query = format!(
            "INSERT INTO chores
                (title, description, priority, status, progress, due_date,
                 assigned_to, todo_checklist, attachments, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ChoreRow>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.priority.as_str())
            .bind(input.status.as_str())
            .bind(input.progress)
            .bind(input.due_date)
            .bind(&input.assigned_to)
            .bind(Json(&input.todo_checklist))
            .bind(&input.attachments)
            .bind(input.created_by)
            .fetch_one(pool)
            .await?;
        decode(row)
    }

    /// Find a chore by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Chore>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chores WHERE id = $1");
        sqlx::query_as::<_, ChoreRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(decode)
            .transpose()
    }

    /// List chores newest first.
    ///
    /// `assignee = Some(id)` restricts to chores assigned to that user;
    /// `status = Some(s)` restricts to one status.
    pub async fn list(
        pool: &PgPool,
        assignee: Option<DbId>,
        status: Option<ChoreStatus>,
    ) -> Result<Vec<Chore>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chores
             WHERE ($1::BIGINT IS NULL OR assigned_to @> ARRAY[$1::BIGINT])
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ChoreRow>(&query)
            .bind(assignee)
            .bind(status.map(ChoreStatus::as_str))
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Write every mutable field of `chore` back to its row.
    ///
    /// Returns `None` if the row no longer exists.
    pub async fn save(pool: &PgPool, chore: &Chore) -> Result<Option<Chore>, sqlx::Error> {
        let query = format!(
            "UPDATE chores SET
                title = $2,
                description = $3,
                priority = $4,
                status = $5,
                progress = $6,
                due_date = $7,
                assigned_to = $8,
                todo_checklist = $9,
                attachments = $10
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChoreRow>(&query)
            .bind(chore.id)
            .bind(&chore.title)
            .bind(&chore.description)
            .bind(chore.priority.as_str())
            .bind(chore.status.as_str())
            .bind(chore.progress)
            .bind(chore.due_date)
            .bind(&chore.assigned_to)
            .bind(Json(&chore.todo_checklist))
            .bind(&chore.attachments)
            .fetch_optional(pool)
            .await?
            .map(decode)
            .transpose()
    }

    /// Hard-delete a chore. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chores WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
