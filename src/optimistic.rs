//! Immutable issue snapshots and the two-phase optimistic move.
//!
//! A move is applied to a new snapshot immediately and starts `Pending`.
//! The caller later settles it as `Confirmed` (the store accepted the write)
//! or `RolledBack` (the store rejected it; the previous status is restored).

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::BoardError;
use crate::models::{Issue, IssueId, StatusId};

/// An immutable view of the issue list. Updates produce a new snapshot.
///
/// Issue ids must be unique; [`crate::load_issues`] rejects files that
/// repeat one.
#[derive(Debug, Clone, Default)]
pub struct IssueSnapshot {
    issues: Arc<[Issue]>,
}

impl IssueSnapshot {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues: issues.into(),
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn get(&self, issue_id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == issue_id)
    }

    /// Issue id to current status, as consumed by the drop validator.
    pub fn status_map(&self) -> HashMap<IssueId, StatusId> {
        self.issues
            .iter()
            .map(|i| (i.id.clone(), i.status.clone()))
            .collect()
    }

    /// A copy of this snapshot with one issue's status replaced.
    pub fn with_status(&self, issue_id: &str, status: &str) -> Result<Self, BoardError> {
        if self.get(issue_id).is_none() {
            return Err(BoardError::IssueNotFound {
                id: issue_id.to_string(),
            });
        }
        let issues: Vec<Issue> = self
            .issues
            .iter()
            .map(|i| {
                if i.id == issue_id {
                    Issue {
                        status: status.to_string(),
                        ..i.clone()
                    }
                } else {
                    i.clone()
                }
            })
            .collect();
        Ok(Self::new(issues))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveState {
    Pending,
    Confirmed,
    RolledBack,
}

impl MoveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::RolledBack => "rolled_back",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimisticMove {
    pub issue_id: IssueId,
    pub previous_status: StatusId,
    pub new_status: StatusId,
    pub state: MoveState,
}

impl OptimisticMove {
    pub fn pending(issue_id: &str, previous_status: &str, new_status: &str) -> Self {
        Self {
            issue_id: issue_id.to_string(),
            previous_status: previous_status.to_string(),
            new_status: new_status.to_string(),
            state: MoveState::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == MoveState::Pending
    }

    fn settle(mut self, next: MoveState) -> Result<Self, BoardError> {
        if !self.is_pending() {
            return Err(BoardError::MoveNotPending {
                issue_id: self.issue_id,
                state: self.state.as_str().to_string(),
            });
        }
        self.state = next;
        Ok(self)
    }

    pub fn confirm(self) -> Result<Self, BoardError> {
        self.settle(MoveState::Confirmed)
    }

    pub fn roll_back(self) -> Result<Self, BoardError> {
        self.settle(MoveState::RolledBack)
    }

    /// Apply this move's local effect to `snapshot`.
    ///
    /// Pending and confirmed moves carry the new status. A rollback only
    /// restores the previous status if the issue still shows the new one, so
    /// a fresher value from the store is never overwritten.
    pub fn apply(&self, snapshot: &IssueSnapshot) -> Result<IssueSnapshot, BoardError> {
        match self.state {
            MoveState::Pending | MoveState::Confirmed => {
                snapshot.with_status(&self.issue_id, &self.new_status)
            }
            MoveState::RolledBack => {
                let current = snapshot.get(&self.issue_id).ok_or_else(|| {
                    BoardError::IssueNotFound {
                        id: self.issue_id.clone(),
                    }
                })?;
                if current.status == self.new_status {
                    snapshot.with_status(&self.issue_id, &self.previous_status)
                } else {
                    Ok(snapshot.clone())
                }
            }
        }
    }
}
