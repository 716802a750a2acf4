//! Dashboard aggregation over grouped chore counts.
//!
//! The database layer supplies `GROUP BY` results as [`GroupCount`] rows;
//! this module folds them into the fixed category sets the dashboard shows.
//! Groups with unknown keys are ignored, and categories with no group count
//! as 0.
//!
//! A summary is assembled from several independent queries, so counts are a
//! point-in-time snapshot per query. A write landing between two of them can
//! make `All` differ from the sum of the named buckets.

use serde::Serialize;

use crate::chore::{ChorePriority, ChoreStatus};
use crate::types::{DbId, Timestamp};

/// Number of recent chores shown on a dashboard.
pub const RECENT_CHORES_LIMIT: i64 = 10;

/// One row of a `GROUP BY` count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

impl GroupCount {
    pub fn new(key: impl Into<String>, count: i64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

fn count_for(groups: &[GroupCount], key: &str) -> i64 {
    groups
        .iter()
        .filter(|g| g.key == key)
        .map(|g| g.count)
        .sum()
}

/// Counts per status plus the synthetic `All` bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChoreDistribution {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub all: i64,
}

impl ChoreDistribution {
    pub fn from_groups(groups: &[GroupCount], total: i64) -> Self {
        Self {
            pending: count_for(groups, ChoreStatus::Pending.as_str()),
            in_progress: count_for(groups, ChoreStatus::InProgress.as_str()),
            completed: count_for(groups, ChoreStatus::Completed.as_str()),
            all: total,
        }
    }

    /// Sum of the three named buckets.
    pub fn named_sum(&self) -> i64 {
        self.pending + self.in_progress + self.completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriorityLevels {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
}

impl PriorityLevels {
    pub fn from_groups(groups: &[GroupCount]) -> Self {
        Self {
            low: count_for(groups, ChorePriority::Low.as_str()),
            medium: count_for(groups, ChorePriority::Medium.as_str()),
            high: count_for(groups, ChorePriority::High.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatistics {
    pub total_chores: i64,
    pub pending_chores: i64,
    pub completed_chores: i64,
    pub overdue_chores: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub chore_distribution: ChoreDistribution,
    pub chore_priority_levels: PriorityLevels,
}

/// Projection of a chore for the "recent chores" list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentChore {
    pub id: DbId,
    pub title: String,
    pub status: ChoreStatus,
    pub priority: ChorePriority,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Raw query results for one dashboard scope.
#[derive(Debug, Clone, Default)]
pub struct DashboardCounts {
    pub total: i64,
    pub overdue: i64,
    pub by_status: Vec<GroupCount>,
    pub by_priority: Vec<GroupCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub statistics: DashboardStatistics,
    pub charts: DashboardCharts,
    pub recent_chores: Vec<RecentChore>,
}

impl DashboardSummary {
    pub fn assemble(counts: &DashboardCounts, recent_chores: Vec<RecentChore>) -> Self {
        let distribution = ChoreDistribution::from_groups(&counts.by_status, counts.total);
        Self {
            statistics: DashboardStatistics {
                total_chores: counts.total,
                pending_chores: distribution.pending,
                completed_chores: distribution.completed,
                overdue_chores: counts.overdue,
            },
            charts: DashboardCharts {
                chore_distribution: distribution,
                chore_priority_levels: PriorityLevels::from_groups(&counts.by_priority),
            },
            recent_chores,
        }
    }
}

/// Per-status counts attached to a chore listing.
///
/// `all` counts every chore in the caller's scope, regardless of the
/// listing's status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub all: i64,
    pub pending_chores: i64,
    pub in_progress_chores: i64,
    pub completed_chores: i64,
}

impl StatusSummary {
    pub fn from_groups(groups: &[GroupCount], total: i64) -> Self {
        let distribution = ChoreDistribution::from_groups(groups, total);
        Self {
            all: total,
            pending_chores: distribution.pending,
            in_progress_chores: distribution.in_progress,
            completed_chores: distribution.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn status_groups() -> Vec<GroupCount> {
        vec![
            GroupCount::new("Pending", 4),
            GroupCount::new("In Progress", 2),
            GroupCount::new("Completed", 3),
        ]
    }

    #[test]
    fn distribution_buckets_sum_to_total() {
        let distribution = ChoreDistribution::from_groups(&status_groups(), 9);
        assert_eq!(distribution.all, 9);
        assert_eq!(distribution.named_sum(), 9);
        assert_eq!(distribution.in_progress, 2);
    }

    #[test]
    fn missing_categories_count_as_zero() {
        let distribution = ChoreDistribution::from_groups(&[GroupCount::new("Completed", 1)], 1);
        assert_eq!(distribution.pending, 0);
        assert_eq!(distribution.in_progress, 0);
        assert_eq!(distribution.completed, 1);

        let priorities = PriorityLevels::from_groups(&[]);
        assert_eq!(priorities, PriorityLevels::default());
    }

    #[test]
    fn unknown_group_keys_are_ignored() {
        let groups = vec![GroupCount::new("Archived", 5), GroupCount::new("Pending", 1)];
        let distribution = ChoreDistribution::from_groups(&groups, 6);
        assert_eq!(distribution.named_sum(), 1);
        assert_eq!(distribution.all, 6);
    }

    #[test]
    fn distribution_serializes_with_compact_keys() {
        let value = serde_json::to_value(ChoreDistribution::from_groups(&status_groups(), 9)).unwrap();
        assert_eq!(
            value,
            json!({"Pending": 4, "InProgress": 2, "Completed": 3, "All": 9})
        );
    }

    #[test]
    fn summary_statistics_reuse_status_groups() {
        let counts = DashboardCounts {
            total: 9,
            overdue: 2,
            by_status: status_groups(),
            by_priority: vec![GroupCount::new("High", 5), GroupCount::new("Low", 4)],
        };
        let summary = DashboardSummary::assemble(&counts, Vec::new());

        assert_eq!(summary.statistics.total_chores, 9);
        assert_eq!(summary.statistics.pending_chores, 4);
        assert_eq!(summary.statistics.completed_chores, 3);
        assert_eq!(summary.statistics.overdue_chores, 2);
        assert_eq!(summary.charts.chore_priority_levels.high, 5);
        assert_eq!(summary.charts.chore_priority_levels.medium, 0);

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["statistics"]["totalChores"], 9);
        assert_eq!(value["charts"]["chorePriorityLevels"]["Low"], 4);
        assert!(value["recentChores"].as_array().unwrap().is_empty());
    }

    #[test]
    fn status_summary_keeps_scope_total() {
        let summary = StatusSummary::from_groups(&status_groups(), 12);
        assert_eq!(summary.all, 12);
        assert_eq!(summary.pending_chores, 4);
        assert_eq!(summary.in_progress_chores, 2);
        assert_eq!(summary.completed_chores, 3);
    }
}
