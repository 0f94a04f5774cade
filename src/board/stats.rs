//! Aggregate board statistics.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::resolver::ColumnView;
use crate::models::{Issue, StatusCategory, StatusId};

/// Trailing window for `completed_this_week`.
pub const COMPLETED_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total_issues: usize,
    /// Issues sitting in `in_progress`-category columns.
    pub wip_issues: usize,
    /// Issues in `done`-category columns updated within the trailing window.
    pub completed_this_week: usize,
}

impl BoardStats {
    /// Counts are summed per column, so an issue claimed by two columns of
    /// the same category is counted twice.
    pub fn compute(total_issues: usize, columns: &[ColumnView<'_>], now: DateTime<Utc>) -> Self {
        let cutoff = now - Duration::days(COMPLETED_WINDOW_DAYS);

        let wip_issues = columns
            .iter()
            .filter(|c| c.column.category == StatusCategory::InProgress)
            .map(|c| c.issues.len())
            .sum();

        let completed_this_week = columns
            .iter()
            .filter(|c| c.column.category == StatusCategory::Done)
            .flat_map(|c| c.issues.iter())
            .filter(|i| i.updated_at >= cutoff)
            .count();

        Self {
            total_issues,
            wip_issues,
            completed_this_week,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SprintStats {
    pub total_issues: usize,
    pub completed_issues: usize,
    pub total_points: u64,
    pub completed_points: u64,
}

impl SprintStats {
    /// Completion uses `category_map` when given; otherwise only the literal
    /// status `"done"` counts as complete.
    pub fn compute<'a, I>(issues: I, category_map: Option<&HashMap<StatusId, StatusCategory>>) -> Self
    where
        I: IntoIterator<Item = &'a Issue>,
    {
        let is_done = |issue: &Issue| match category_map {
            Some(map) => map.get(&issue.status) == Some(&StatusCategory::Done),
            None => issue.status == "done",
        };

        let mut stats = Self::default();
        for issue in issues {
            let points = u64::from(issue.story_points.unwrap_or(0));
            stats.total_issues += 1;
            stats.total_points += points;
            if is_done(issue) {
                stats.completed_issues += 1;
                stats.completed_points += points;
            }
        }
        stats
    }

    /// Fraction of story points completed, 0.0 when the sprint has none.
    pub fn point_progress(&self) -> f64 {
        if self.total_points == 0 {
            0.0
        } else {
            self.completed_points as f64 / self.total_points as f64
        }
    }
}
