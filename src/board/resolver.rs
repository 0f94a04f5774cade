//! Projection of the flat issue list onto board columns.
//!
//! Everything here is recomputed from scratch on each call. Issues whose
//! status no column claims are left out of every column; nothing errors.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::BoardConfig;
use super::filter::IssueFilter;
use super::kind::BoardKind;
use super::stats::{BoardStats, SprintStats};
use crate::models::{Column, Issue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WipStatus {
    Normal,
    Warning,
    Exceeded,
}

impl WipStatus {
    /// `Warning` from 80% of the limit, `Exceeded` at the limit itself.
    pub fn for_count(max_issues: Option<usize>, count: usize) -> Self {
        let Some(max) = max_issues else {
            return WipStatus::Normal;
        };
        if count >= max {
            WipStatus::Exceeded
        } else if (count as u128) * 5 >= (max as u128) * 4 {
            // count >= 0.8 * max, widened so huge limits cannot overflow
            WipStatus::Warning
        } else {
            WipStatus::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

/// Multi-status columns match on `status_ids`; a column without them
/// matches issues whose status equals the column id.
pub fn issue_in_column(issue: &Issue, column: &Column) -> bool {
    if column.status_ids.is_empty() {
        issue.status == column.id
    } else {
        column.status_ids.iter().any(|s| *s == issue.status)
    }
}

/// Issues belonging to `column`, in input order. Expects already-filtered input.
pub fn column_issues<'a, I>(filtered: I, column: &Column) -> Vec<&'a Issue>
where
    I: IntoIterator<Item = &'a Issue>,
{
    filtered
        .into_iter()
        .filter(|issue| issue_in_column(issue, column))
        .collect()
}

pub fn wip_status<'a, I>(column: &Column, issues: I) -> WipStatus
where
    I: IntoIterator<Item = &'a Issue>,
{
    let count = issues
        .into_iter()
        .filter(|issue| issue_in_column(issue, column))
        .count();
    WipStatus::for_count(column.max_issues, count)
}

/// Status assigned to a card dropped anywhere on `column`: always the
/// first configured status, or the column id for single-status columns.
pub fn drop_status_id(column: &Column) -> &str {
    column
        .status_ids
        .first()
        .map(String::as_str)
        .unwrap_or(column.id.as_str())
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnView<'a> {
    pub column: &'a Column,
    pub issues: Vec<&'a Issue>,
    pub wip: WipStatus,
    pub below_minimum: bool,
}

impl ColumnView<'_> {
    pub fn count(&self) -> usize {
        self.issues.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardView<'a> {
    pub name: &'a str,
    pub kind: BoardKind,
    pub columns: Vec<ColumnView<'a>>,
    pub stats: BoardStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint: Option<SprintStats>,
}

impl BoardView<'_> {
    pub fn column(&self, id: &str) -> Option<&ColumnView<'_>> {
        self.columns.iter().find(|c| c.column.id == id)
    }
}

/// Filter, group, and summarize `issues` for display.
///
/// WIP state is only computed for kinds that apply limits; other kinds
/// always report `Normal`.
pub fn resolve_board<'a>(
    config: &'a BoardConfig,
    issues: &'a [Issue],
    filter: &IssueFilter,
    now: DateTime<Utc>,
) -> BoardView<'a> {
    let filtered = filter.apply(issues);

    let columns: Vec<ColumnView<'a>> = config
        .columns
        .iter()
        .map(|column| {
            let col_issues = column_issues(filtered.iter().copied(), column);
            let wip = if config.kind.applies_wip_limits() {
                WipStatus::for_count(column.max_issues, col_issues.len())
            } else {
                WipStatus::Normal
            };
            ColumnView {
                column,
                below_minimum: column.below_minimum(col_issues.len()),
                issues: col_issues,
                wip,
            }
        })
        .collect();

    let stats = BoardStats::compute(filtered.len(), &columns, now);
    let sprint = config.kind.tracks_sprints().then(|| {
        let category_map = config.category_map();
        SprintStats::compute(filtered.iter().copied(), category_map.as_ref())
    });

    tracing::debug!(
        board = %config.name,
        total = stats.total_issues,
        wip = stats.wip_issues,
        "resolved board"
    );

    BoardView {
        name: &config.name,
        kind: config.kind,
        columns,
        stats,
        sprint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusCategory;
    use chrono::Duration;
    use proptest::prelude::*;

    fn issue(id: &str, status: &str) -> Issue {
        Issue::new(id, status, Utc::now())
    }

    fn single(id: &str, category: StatusCategory) -> Column {
        Column::new(id, id, category)
    }

    fn issues_with_status(n: usize, status: &str) -> Vec<Issue> {
        (0..n).map(|i| issue(&format!("I-{i}"), status)).collect()
    }

    #[test]
    fn test_issue_in_column_fallback_to_column_id() {
        let col = single("todo", StatusCategory::Todo);
        assert!(issue_in_column(&issue("A", "todo"), &col));
        assert!(!issue_in_column(&issue("A", "done"), &col));
    }

    #[test]
    fn test_issue_in_column_ignores_id_when_status_ids_set() {
        let col = Column::new("review", "Review", StatusCategory::InProgress).with_statuses(&["qa"]);
        assert!(issue_in_column(&issue("A", "qa"), &col));
        assert!(!issue_in_column(&issue("B", "review"), &col));
    }

    #[test]
    fn test_column_issues_does_not_mutate_input() {
        let all = vec![issue("A", "todo"), issue("B", "done"), issue("C", "todo")];
        let before = all.clone();
        let col = single("todo", StatusCategory::Todo);
        let found: Vec<_> = column_issues(&all, &col).iter().map(|i| i.id.clone()).collect();
        assert_eq!(found, vec!["A", "C"]);
        assert_eq!(all, before);
    }

    #[test]
    fn test_wip_boundaries_at_limit_ten() {
        let col = single("in_progress", StatusCategory::InProgress).with_max_issues(10);
        assert_eq!(wip_status(&col, &issues_with_status(7, "in_progress")), WipStatus::Normal);
        assert_eq!(wip_status(&col, &issues_with_status(8, "in_progress")), WipStatus::Warning);
        assert_eq!(wip_status(&col, &issues_with_status(9, "in_progress")), WipStatus::Warning);
        assert_eq!(wip_status(&col, &issues_with_status(10, "in_progress")), WipStatus::Exceeded);
    }

    #[test]
    fn test_wip_with_huge_limit() {
        let max = usize::MAX / 4 + 1;
        assert_eq!(WipStatus::for_count(Some(max), 1), WipStatus::Normal);
        assert_eq!(WipStatus::for_count(Some(usize::MAX), usize::MAX - 1), WipStatus::Warning);
        assert_eq!(WipStatus::for_count(Some(usize::MAX), usize::MAX), WipStatus::Exceeded);
    }

    #[test]
    fn test_wip_exceeded_scenario() {
        let col = single("doing", StatusCategory::InProgress).with_max_issues(2);
        assert_eq!(wip_status(&col, &issues_with_status(3, "doing")), WipStatus::Exceeded);
    }

    #[test]
    fn test_wip_without_limit_is_normal() {
        let col = single("doing", StatusCategory::InProgress);
        assert_eq!(wip_status(&col, &issues_with_status(50, "doing")), WipStatus::Normal);
    }

    #[test]
    fn test_wip_counts_only_matching_issues() {
        let col = single("doing", StatusCategory::InProgress).with_max_issues(2);
        let mut all = issues_with_status(1, "doing");
        all.extend(issues_with_status(5, "todo"));
        assert_eq!(wip_status(&col, &all), WipStatus::Normal);
    }

    #[test]
    fn test_drop_status_id() {
        let merged = Column::new("review", "Review", StatusCategory::InProgress)
            .with_statuses(&["review", "qa"]);
        assert_eq!(drop_status_id(&merged), "review");
        let reordered = Column::new("review", "Review", StatusCategory::InProgress)
            .with_statuses(&["qa", "review"]);
        assert_eq!(drop_status_id(&reordered), "qa");
        assert_eq!(drop_status_id(&single("todo", StatusCategory::Todo)), "todo");
    }

    #[test]
    fn test_simple_board_scenario() {
        let config = BoardConfig::new("Simple", BoardKind::Basic);
        let issues = vec![issue("A", "todo"), issue("B", "in_progress"), issue("C", "done")];
        let view = resolve_board(&config, &issues, &IssueFilter::new(), Utc::now());

        for col in &view.columns {
            assert_eq!(col.count(), 1, "column {}", col.column.id);
        }
        assert_eq!(view.stats.total_issues, 3);
        assert_eq!(view.stats.wip_issues, 1);
        assert!(view.sprint.is_none());
    }

    #[test]
    fn test_merged_column_scenario() {
        let mut config = BoardConfig::new("Merged", BoardKind::Basic);
        config.columns = vec![
            single("todo", StatusCategory::Todo),
            Column::new("review", "Review", StatusCategory::InProgress)
                .with_statuses(&["review", "qa"]),
        ];
        let issues = vec![issue("A", "review"), issue("B", "qa"), issue("C", "todo")];
        let view = resolve_board(&config, &issues, &IssueFilter::new(), Utc::now());

        let review = view.column("review").unwrap();
        let ids: Vec<_> = review.issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(drop_status_id(review.column), "review");
    }

    #[test]
    fn test_unclaimed_status_is_excluded_everywhere() {
        let config = BoardConfig::new("Simple", BoardKind::Basic);
        let issues = vec![issue("A", "blocked")];
        let view = resolve_board(&config, &issues, &IssueFilter::new(), Utc::now());
        assert!(view.columns.iter().all(|c| c.issues.is_empty()));
        assert_eq!(view.stats.total_issues, 1);
    }

    #[test]
    fn test_wip_only_applied_on_kanban() {
        let mut config = BoardConfig::new("Basic", BoardKind::Basic);
        config.columns = vec![single("doing", StatusCategory::InProgress).with_max_issues(1)];
        let issues = issues_with_status(2, "doing");

        let view = resolve_board(&config, &issues, &IssueFilter::new(), Utc::now());
        assert_eq!(view.columns[0].wip, WipStatus::Normal);

        config.kind = BoardKind::Kanban;
        let view = resolve_board(&config, &issues, &IssueFilter::new(), Utc::now());
        assert_eq!(view.columns[0].wip, WipStatus::Exceeded);
    }

    #[test]
    fn test_filters_apply_before_columns() {
        let config = BoardConfig::new("Simple", BoardKind::Basic);
        let issues = vec![
            issue("A", "todo").with_title("Payments"),
            issue("B", "todo").with_title("Search"),
        ];
        let filter = IssueFilter::new().with_search("pay");
        let view = resolve_board(&config, &issues, &filter, Utc::now());
        assert_eq!(view.column("todo").unwrap().count(), 1);
        assert_eq!(view.stats.total_issues, 1);
    }

    #[test]
    fn test_scrum_board_reports_sprint_stats() {
        let config = BoardConfig::new("Sprint", BoardKind::Scrum);
        let issues = vec![
            issue("A", "done").with_points(3),
            issue("B", "todo").with_points(5),
        ];
        let now = Utc::now() + Duration::minutes(1);
        let view = resolve_board(&config, &issues, &IssueFilter::new(), now);
        let sprint = view.sprint.unwrap();
        assert_eq!(sprint.total_points, 8);
        assert_eq!(sprint.completed_points, 3);
    }

    proptest! {
        #[test]
        fn fallback_matches_exact_column_id(status in "[a-z_]{1,12}", column_id in "[a-z_]{1,12}") {
            let col = Column::new(&column_id, "Column", StatusCategory::Todo);
            let i = issue("X", &status);
            prop_assert_eq!(issue_in_column(&i, &col), status == column_id);
        }

        #[test]
        fn drop_target_ignores_occupants(n in 0usize..20) {
            let col = Column::new("review", "Review", StatusCategory::InProgress)
                .with_statuses(&["review", "qa"]);
            let occupants = issues_with_status(n, "qa");
            prop_assert_eq!(column_issues(&occupants, &col).len(), n);
            prop_assert_eq!(drop_status_id(&col), "review");
        }
    }
}
