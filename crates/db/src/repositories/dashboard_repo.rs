//! Aggregation queries over `chores` for dashboards and listing summaries.
//!
//! Every function takes an optional assignee scope: `None` covers all chores,
//! `Some(user_id)` only chores assigned to that user. Each call is its own
//! query; there is no snapshot shared between them.

use bitchore_core::chore::ChoreStatus;
use bitchore_core::dashboard::{DashboardCounts, GroupCount, RecentChore};
use bitchore_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::chore::{decode, GroupCountRow, RecentChoreRow};

const SCOPE: &str = "($1::BIGINT IS NULL OR assigned_to @> ARRAY[$1::BIGINT])";

/// Provides count and grouping queries for dashboard widgets.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Total chores in scope.
    pub async fn total(pool: &PgPool, assignee: Option<DbId>) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM chores WHERE {SCOPE}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(assignee)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Chores in scope grouped by status.
    pub async fn status_groups(
        pool: &PgPool,
        assignee: Option<DbId>,
    ) -> Result<Vec<GroupCount>, sqlx::Error> {
        Self::group_by(pool, "status", assignee).await
    }

    /// Chores in scope grouped by priority.
    pub async fn priority_groups(
        pool: &PgPool,
        assignee: Option<DbId>,
    ) -> Result<Vec<GroupCount>, sqlx::Error> {
        Self::group_by(pool, "priority", assignee).await
    }

    /// Chores in scope that are not completed and whose due date is before `now`.
    pub async fn overdue(
        pool: &PgPool,
        assignee: Option<DbId>,
        now: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM chores
             WHERE {SCOPE} AND status <> $2 AND due_date < $3"
        );
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(assignee)
            .bind(ChoreStatus::Completed.as_str())
            .bind(now)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// The `limit` most recently created chores in scope.
    pub async fn recent(
        pool: &PgPool,
        assignee: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<RecentChore>, sqlx::Error> {
        let query = format!(
            "SELECT id, title, status, priority, due_date, created_at FROM chores
             WHERE {SCOPE}
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, RecentChoreRow>(&query)
            .bind(assignee)
            .bind(limit)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Run the four count queries that feed a dashboard summary.
    pub async fn counts(
        pool: &PgPool,
        assignee: Option<DbId>,
        now: Timestamp,
    ) -> Result<DashboardCounts, sqlx::Error> {
        Ok(DashboardCounts {
            total: Self::total(pool, assignee).await?,
            overdue: Self::overdue(pool, assignee, now).await?,
            by_status: Self::status_groups(pool, assignee).await?,
            by_priority: Self::priority_groups(pool, assignee).await?,
        })
    }

    /// `column` is always one of the fixed literals above, never user input.
    async fn group_by(
        pool: &PgPool,
        column: &'static str,
        assignee: Option<DbId>,
    ) -> Result<Vec<GroupCount>, sqlx::Error> {
        let query = format!(
            "SELECT {column} AS key, COUNT(*) AS count FROM chores
             WHERE {SCOPE}
             GROUP BY {column}"
        );
        let rows = sqlx::query_as::<_, GroupCountRow>(&query)
            .bind(assignee)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(GroupCount::from).collect())
    }
}
