//! Typed error hierarchy for trackboard.
//!
//! Two top-level enums cover the two failure surfaces:
//! - `BoardError`: board session and optimistic move failures
//! - `ConfigError`: board configuration parsing and validation failures
//!
//! Transition denials are not errors; the validator returns a `Verdict`.

use thiserror::Error;

/// Errors from a board session (drops, confirmations, rollbacks).
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Issue {id} not found")]
    IssueNotFound { id: String },

    #[error("Column {id} not found")]
    ColumnNotFound { id: String },

    #[error("Issue {issue_id} already has a pending move to '{to_status}'")]
    MovePending { issue_id: String, to_status: String },

    #[error("Move for issue {issue_id} is already {state}")]
    MoveNotPending { issue_id: String, state: String },

    #[error("No pending move for issue {issue_id}")]
    NoPendingMove { issue_id: String },
}

/// Errors from loading or validating a board configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid status category '{0}'. Valid values: todo, in_progress, done")]
    InvalidCategory(String),

    #[error("Invalid board kind '{0}'. Valid values: basic, kanban, scrum")]
    InvalidBoardKind(String),

    #[error("Unknown plugin '{0}'")]
    UnknownPlugin(String),

    #[error("Status '{0}' is defined more than once")]
    DuplicateStatus(String),

    #[error("Column '{0}' is defined more than once")]
    DuplicateColumn(String),

    #[error("Column coverage is incomplete: {gaps} unclaimed, {overlaps} overlapping status(es)")]
    Coverage { gaps: usize, overlaps: usize },
}
