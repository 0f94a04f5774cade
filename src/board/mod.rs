//! Board resolution: columns, filters, WIP state, statistics, and the
//! interactive session that applies drops.
//!
//! | Module      | Responsibility                                        |
//! |-------------|-------------------------------------------------------|
//! | `kind`      | `BoardKind` defaults and which metrics apply          |
//! | `filter`    | search and assignee filters, run before columns       |
//! | `resolver`  | column membership, WIP state, drop targets, views     |
//! | `stats`     | board totals and sprint progress                      |
//! | `coverage`  | gap/overlap report for column status claims           |
//! | `session`   | snapshot-backed drops with optimistic settlement      |

pub mod coverage;
pub mod filter;
pub mod kind;
pub mod resolver;
pub mod session;
pub mod stats;

pub use coverage::{CoverageReport, check_coverage};
pub use filter::{AssigneeFilter, IssueFilter};
pub use kind::BoardKind;
pub use resolver::{
    BoardView, ColumnView, WipStatus, column_issues, drop_status_id, issue_in_column,
    resolve_board, wip_status,
};
pub use session::{BoardSession, DropOutcome, MoveSink};
pub use stats::{BoardStats, SprintStats};

use std::collections::HashMap;

use crate::features::FeatureGates;
use crate::models::{Column, Status, StatusCategory, StatusId, Transition};
use crate::workflow::Workflow;

/// Everything needed to resolve and operate one board.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub name: String,
    pub kind: BoardKind,
    pub workflow: Workflow,
    pub columns: Vec<Column>,
    pub features: FeatureGates,
}

impl BoardConfig {
    /// A board with the kind's default columns, an open workflow over those
    /// columns' statuses, and the kind's own plugin enabled.
    pub fn new(name: &str, kind: BoardKind) -> Self {
        let columns = kind.default_columns();
        Self {
            name: name.to_string(),
            kind,
            workflow: open_workflow(&columns),
            columns,
            features: FeatureGates::new(kind.required_plugin()),
        }
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// `None` when the workflow defines no statuses, which makes sprint
    /// stats fall back to the literal `"done"` status.
    pub fn category_map(&self) -> Option<HashMap<StatusId, StatusCategory>> {
        (!self.workflow.statuses.is_empty()).then(|| self.workflow.category_map())
    }

    pub fn coverage(&self) -> CoverageReport {
        check_coverage(&self.workflow, &self.columns)
    }

    /// Human-readable configuration problems that do not prevent use.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(plugin) = self.kind.required_plugin()
            && !self.features.plugin_enabled(plugin)
        {
            warnings.push(format!(
                "board kind '{}' requires plugin '{}', which is not enabled",
                self.kind,
                plugin.as_str()
            ));
        }

        let report = self.coverage();
        for status in &report.gaps {
            warnings.push(format!("status '{}' is not claimed by any column", status));
        }
        for (status, columns) in &report.overlaps {
            warnings.push(format!(
                "status '{}' is claimed by several columns: {}",
                status,
                columns.join(", ")
            ));
        }
        for status in &report.unknown {
            warnings.push(format!(
                "a column claims status '{}', which the workflow does not define",
                status
            ));
        }

        for t in self.workflow.broken_transitions() {
            warnings.push(format!(
                "transition {} -> {} references an undefined status",
                t.from.as_deref().unwrap_or("*"),
                t.to
            ));
        }
        for status in self.workflow.dead_ends() {
            if status.category != StatusCategory::Done {
                warnings.push(format!("status '{}' has no outgoing transition", status.id));
            }
        }

        warnings
    }
}

/// One status per claimed column status, in column order, categorized by
/// the first column that claims it.
pub fn column_statuses(columns: &[Column]) -> Vec<Status> {
    let mut statuses: Vec<Status> = Vec::new();
    for column in columns {
        for id in column.claimed_statuses() {
            if !statuses.iter().any(|s| s.id == id) {
                statuses.push(Status::new(id, id, column.category));
            }
        }
    }
    statuses
}

/// The columns' statuses, each reachable from anywhere.
pub fn open_workflow(columns: &[Column]) -> Workflow {
    let statuses = column_statuses(columns);
    let transitions = statuses.iter().map(|s| Transition::global(&s.id)).collect();
    Workflow::new(statuses, transitions)
}
