//! Drop validation bound to an issue-status snapshot.
//!
//! A [`DropValidator`] is built once per drag session from the latest issue
//! list and answers every drop query against that snapshot. It never mutates
//! anything, so identical inputs always produce identical verdicts.

use std::collections::HashMap;

use serde::Serialize;

use super::Workflow;
use crate::models::{IssueId, StatusId};

/// Why a drop was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenyReason {
    /// The issue is not in the snapshot, so its current status is unknown.
    UnknownIssue,
    /// No intact direct or global transition reaches the target.
    NoTransition { from: StatusId, to: StatusId },
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::UnknownIssue => write!(f, "unknown issue"),
            DenyReason::NoTransition { from, to } => {
                write!(f, "no transition from '{}' to '{}'", from, to)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Allowed,
    Denied { reason: DenyReason },
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed)
    }

    pub fn reason(&self) -> Option<&DenyReason> {
        match self {
            Verdict::Allowed => None,
            Verdict::Denied { reason } => Some(reason),
        }
    }

    fn denied(reason: DenyReason) -> Self {
        Verdict::Denied { reason }
    }
}

pub struct DropValidator<'a> {
    workflow: &'a Workflow,
    snapshot: HashMap<IssueId, StatusId>,
}

/// Bind a validator to the workflow and the current issue-status snapshot.
pub fn create_drop_validator(
    workflow: &Workflow,
    snapshot: HashMap<IssueId, StatusId>,
) -> DropValidator<'_> {
    DropValidator { workflow, snapshot }
}

impl DropValidator<'_> {
    pub fn current_status(&self, issue_id: &str) -> Option<&str> {
        self.snapshot.get(issue_id).map(String::as_str)
    }

    /// Decide whether `issue_id` may move to `target_status_id`.
    ///
    /// Unknown issues fail closed. A move to the current status is always
    /// allowed, even when that status is missing from the workflow.
    pub fn validate(&self, issue_id: &str, target_status_id: &str) -> Verdict {
        let Some(current) = self.current_status(issue_id) else {
            tracing::debug!(issue_id, target = target_status_id, "drop denied: unknown issue");
            return Verdict::denied(DenyReason::UnknownIssue);
        };

        if current == target_status_id || self.workflow.permits(current, target_status_id) {
            return Verdict::Allowed;
        }

        tracing::debug!(
            issue_id,
            from = current,
            to = target_status_id,
            "drop denied: no transition"
        );
        Verdict::denied(DenyReason::NoTransition {
            from: current.to_string(),
            to: target_status_id.to_string(),
        })
    }
}
