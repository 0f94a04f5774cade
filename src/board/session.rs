//! A board session: the current snapshot, drop handling, and settlement of
//! optimistic moves.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::BoardConfig;
use super::filter::IssueFilter;
use super::resolver::{BoardView, drop_status_id, resolve_board};
use crate::errors::BoardError;
use crate::models::{Issue, IssueId};
use crate::optimistic::{IssueSnapshot, OptimisticMove};
use crate::workflow::{DenyReason, DropValidator, Verdict, create_drop_validator};

/// Receives locally-applied moves for persistence. The session does not
/// wait for or inspect the outcome; settle it with
/// [`BoardSession::confirm`] or [`BoardSession::roll_back`].
pub trait MoveSink {
    fn on_issue_move(&mut self, issue_id: &str, new_status_id: &str);
}

impl<F> MoveSink for F
where
    F: FnMut(&str, &str),
{
    fn on_issue_move(&mut self, issue_id: &str, new_status_id: &str) {
        self(issue_id, new_status_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Applied locally and handed to the sink; awaiting settlement.
    Applied(OptimisticMove),
    /// Target equals the current status; nothing happened.
    Unchanged,
    /// The workflow refused the move; the snapshot is untouched.
    Rejected(DenyReason),
}

pub struct BoardSession {
    config: BoardConfig,
    snapshot: IssueSnapshot,
    pending: HashMap<IssueId, OptimisticMove>,
}

impl BoardSession {
    pub fn new(config: BoardConfig, issues: Vec<Issue>) -> Self {
        Self {
            config,
            snapshot: IssueSnapshot::new(issues),
            pending: HashMap::new(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &IssueSnapshot {
        &self.snapshot
    }

    pub fn pending_move(&self, issue_id: &str) -> Option<&OptimisticMove> {
        self.pending.get(issue_id)
    }

    /// Install fresh data from the store. Pending moves are dropped since
    /// the store's view is authoritative.
    pub fn replace_issues(&mut self, issues: Vec<Issue>) {
        if !self.pending.is_empty() {
            tracing::debug!(
                discarded = self.pending.len(),
                "discarding pending moves on reload"
            );
        }
        self.snapshot = IssueSnapshot::new(issues);
        self.pending.clear();
    }

    pub fn view(&self, filter: &IssueFilter, now: DateTime<Utc>) -> BoardView<'_> {
        resolve_board(&self.config, self.snapshot.issues(), filter, now)
    }

    /// A validator bound to the current snapshot.
    pub fn validator(&self) -> DropValidator<'_> {
        create_drop_validator(&self.config.workflow, self.snapshot.status_map())
    }

    /// Verdict for dropping `issue_id` onto `column_id`, without applying it.
    pub fn check_drop(&self, issue_id: &str, column_id: &str) -> Result<Verdict, BoardError> {
        let column = self.config.column(column_id).ok_or_else(|| BoardError::ColumnNotFound {
            id: column_id.to_string(),
        })?;
        Ok(self.validator().validate(issue_id, drop_status_id(column)))
    }

    /// Drop a card onto a column. The target status is the column's first
    /// configured status.
    pub fn drop_issue(
        &mut self,
        issue_id: &str,
        column_id: &str,
        sink: &mut dyn MoveSink,
    ) -> Result<DropOutcome, BoardError> {
        let target = self
            .config
            .column(column_id)
            .map(|c| drop_status_id(c).to_string())
            .ok_or_else(|| BoardError::ColumnNotFound {
                id: column_id.to_string(),
            })?;
        self.move_issue(issue_id, &target, sink)
    }

    /// Validate and optimistically apply a status change.
    pub fn move_issue(
        &mut self,
        issue_id: &str,
        target_status: &str,
        sink: &mut dyn MoveSink,
    ) -> Result<DropOutcome, BoardError> {
        if let Some(existing) = self.pending.get(issue_id) {
            return Err(BoardError::MovePending {
                issue_id: issue_id.to_string(),
                to_status: existing.new_status.clone(),
            });
        }

        let validator = self.validator();
        let previous = match validator.current_status(issue_id) {
            Some(status) => status.to_string(),
            None => return Ok(DropOutcome::Rejected(DenyReason::UnknownIssue)),
        };
        if let Verdict::Denied { reason } = validator.validate(issue_id, target_status) {
            return Ok(DropOutcome::Rejected(reason));
        }
        if previous == target_status {
            return Ok(DropOutcome::Unchanged);
        }

        let mv = OptimisticMove::pending(issue_id, &previous, target_status);
        self.snapshot = mv.apply(&self.snapshot)?;
        self.pending.insert(issue_id.to_string(), mv.clone());
        tracing::info!(issue_id, from = %previous, to = target_status, "move applied locally");

        sink.on_issue_move(issue_id, target_status);
        Ok(DropOutcome::Applied(mv))
    }

    fn take_pending(&mut self, issue_id: &str) -> Result<OptimisticMove, BoardError> {
        self.pending
            .remove(issue_id)
            .ok_or_else(|| BoardError::NoPendingMove {
                issue_id: issue_id.to_string(),
            })
    }

    /// The store accepted the write.
    pub fn confirm(&mut self, issue_id: &str) -> Result<OptimisticMove, BoardError> {
        let mv = self.take_pending(issue_id)?.confirm()?;
        tracing::debug!(issue_id, status = %mv.new_status, "move confirmed");
        Ok(mv)
    }

    /// The store rejected the write; restore the previous status.
    pub fn roll_back(&mut self, issue_id: &str) -> Result<OptimisticMove, BoardError> {
        let mv = self.take_pending(issue_id)?.roll_back()?;
        self.snapshot = mv.apply(&self.snapshot)?;
        tracing::warn!(issue_id, restored = %mv.previous_status, "move rolled back");
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardKind;
    use crate::models::{Column, Status, StatusCategory, Transition};
    use crate::optimistic::MoveState;
    use crate::workflow::Workflow;

    fn config() -> BoardConfig {
        let mut config = BoardConfig::new("Team", BoardKind::Kanban);
        config.columns = vec![
            Column::new("todo", "To Do", StatusCategory::Todo),
            Column::new("in_progress", "In Progress", StatusCategory::InProgress),
            Column::new("review", "Review", StatusCategory::InProgress)
                .with_statuses(&["review", "qa"]),
            Column::new("done", "Done", StatusCategory::Done),
        ];
        config.workflow = Workflow::new(
            vec![
                Status::new("todo", "To Do", StatusCategory::Todo),
                Status::new("in_progress", "In Progress", StatusCategory::InProgress),
                Status::new("review", "Review", StatusCategory::InProgress),
                Status::new("qa", "QA", StatusCategory::InProgress),
                Status::new("done", "Done", StatusCategory::Done),
            ],
            vec![
                Transition::new("todo", "in_progress"),
                Transition::new("in_progress", "review"),
                Transition::new("qa", "done"),
                Transition::new("review", "qa"),
            ],
        );
        config
    }

    fn session() -> BoardSession {
        let now = Utc::now();
        BoardSession::new(
            config(),
            vec![
                Issue::new("A", "todo", now),
                Issue::new("B", "in_progress", now),
                Issue::new("C", "qa", now),
            ],
        )
    }

    fn noop_sink() -> impl FnMut(&str, &str) {
        |_: &str, _: &str| {}
    }

    #[test]
    fn test_valid_drop_applies_and_notifies_sink() {
        let mut s = session();
        let mut calls: Vec<(String, String)> = Vec::new();
        let mut sink = |id: &str, status: &str| calls.push((id.to_string(), status.to_string()));

        let outcome = s.drop_issue("A", "in_progress", &mut sink).unwrap();
        assert!(matches!(outcome, DropOutcome::Applied(ref mv) if mv.state == MoveState::Pending));
        assert_eq!(s.snapshot().get("A").unwrap().status, "in_progress");
        assert!(s.pending_move("A").is_some());
        assert_eq!(calls, vec![("A".to_string(), "in_progress".to_string())]);
    }

    #[test]
    fn test_drop_on_merged_column_uses_first_status() {
        let mut s = session();
        let mut sink = noop_sink();
        let outcome = s.drop_issue("B", "review", &mut sink).unwrap();
        match outcome {
            DropOutcome::Applied(mv) => assert_eq!(mv.new_status, "review"),
            other => panic!("Expected Applied, got {:?}", other),
        }
    }

    #[test]
    fn test_denied_drop_leaves_snapshot_and_sink_untouched() {
        let mut s = session();
        let mut called = false;
        let mut sink = |_: &str, _: &str| called = true;
        let outcome = s.drop_issue("A", "done", &mut sink).unwrap();
        assert!(matches!(outcome, DropOutcome::Rejected(DenyReason::NoTransition { .. })));
        assert_eq!(s.snapshot().get("A").unwrap().status, "todo");
        assert!(!called);
    }

    #[test]
    fn test_drop_unknown_issue_is_rejected() {
        let mut s = session();
        let mut sink = noop_sink();
        let outcome = s.drop_issue("Z", "todo", &mut sink).unwrap();
        assert_eq!(outcome, DropOutcome::Rejected(DenyReason::UnknownIssue));
    }

    #[test]
    fn test_drop_unknown_column_is_error() {
        let mut s = session();
        let mut sink = noop_sink();
        let err = s.drop_issue("A", "icebox", &mut sink).unwrap_err();
        assert!(matches!(err, BoardError::ColumnNotFound { ref id } if id == "icebox"));
    }

    #[test]
    fn test_drop_on_own_column_is_unchanged() {
        let mut s = session();
        let mut sink = noop_sink();
        assert_eq!(s.drop_issue("A", "todo", &mut sink).unwrap(), DropOutcome::Unchanged);
        assert!(s.pending_move("A").is_none());
    }

    #[test]
    fn test_second_drop_while_pending_is_error() {
        let mut s = session();
        let mut sink = noop_sink();
        s.drop_issue("A", "in_progress", &mut sink).unwrap();
        let err = s.drop_issue("A", "review", &mut sink).unwrap_err();
        assert!(matches!(err, BoardError::MovePending { .. }));
    }

    #[test]
    fn test_confirm_keeps_new_status() {
        let mut s = session();
        let mut sink = noop_sink();
        s.drop_issue("A", "in_progress", &mut sink).unwrap();
        let mv = s.confirm("A").unwrap();
        assert_eq!(mv.state, MoveState::Confirmed);
        assert_eq!(s.snapshot().get("A").unwrap().status, "in_progress");
        assert!(s.pending_move("A").is_none());
    }

    #[test]
    fn test_roll_back_restores_previous_status() {
        let mut s = session();
        let mut sink = noop_sink();
        s.drop_issue("A", "in_progress", &mut sink).unwrap();
        let mv = s.roll_back("A").unwrap();
        assert_eq!(mv.state, MoveState::RolledBack);
        assert_eq!(s.snapshot().get("A").unwrap().status, "todo");
    }

    #[test]
    fn test_settle_without_pending_move_is_error() {
        let mut s = session();
        assert!(matches!(s.confirm("A"), Err(BoardError::NoPendingMove { .. })));
        assert!(matches!(s.roll_back("A"), Err(BoardError::NoPendingMove { .. })));
    }

    #[test]
    fn test_replace_issues_discards_pending() {
        let mut s = session();
        let mut sink = noop_sink();
        s.drop_issue("A", "in_progress", &mut sink).unwrap();
        s.replace_issues(vec![Issue::new("A", "review", Utc::now())]);
        assert!(s.pending_move("A").is_none());
        assert_eq!(s.snapshot().get("A").unwrap().status, "review");
    }

    #[test]
    fn test_check_drop_does_not_apply() {
        let s = session();
        assert!(s.check_drop("C", "done").unwrap().is_allowed());
        assert_eq!(s.snapshot().get("C").unwrap().status, "qa");
    }

    #[test]
    fn test_view_reflects_optimistic_move() {
        let mut s = session();
        let mut sink = noop_sink();
        s.drop_issue("B", "review", &mut sink).unwrap();
        let view = s.view(&IssueFilter::new(), Utc::now());
        assert_eq!(view.column("review").unwrap().count(), 2);
        assert_eq!(view.column("in_progress").unwrap().count(), 0);
    }
}
