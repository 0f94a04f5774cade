//! Workflow graph: statuses, permitted transitions, and drop validation.
//!
//! A workflow is a directed graph over statuses. Each issue sits at exactly
//! one node; a validated drop is an edge traversal. Transitions that name a
//! status the workflow does not define are ignored everywhere in this module
//! rather than treated as errors.
//!
//! - [`Workflow`]: the graph plus diagnostic queries
//! - [`validator`]: snapshot-bound drop validation

pub mod validator;

pub use validator::{DenyReason, DropValidator, Verdict, create_drop_validator};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Status, StatusCategory, StatusId, Transition};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl Workflow {
    pub fn new(statuses: Vec<Status>, transitions: Vec<Transition>) -> Self {
        Self {
            statuses,
            transitions,
        }
    }

    pub fn status(&self, id: &str) -> Option<&Status> {
        self.statuses.iter().find(|s| s.id == id)
    }

    pub fn has_status(&self, id: &str) -> bool {
        self.status(id).is_some()
    }

    /// Status id to category, for progress math over raw status ids.
    pub fn category_map(&self) -> HashMap<StatusId, StatusCategory> {
        self.statuses
            .iter()
            .map(|s| (s.id.clone(), s.category))
            .collect()
    }

    /// A transition is usable only if every status it names exists.
    fn is_intact(&self, transition: &Transition) -> bool {
        if !self.has_status(&transition.to) {
            return false;
        }
        if transition.is_global() {
            return true;
        }
        transition
            .from
            .as_deref()
            .is_some_and(|from| self.has_status(from))
    }

    /// Whether an intact edge leads from `from` to `to`, directly or globally.
    pub fn permits(&self, from: &str, to: &str) -> bool {
        self.transitions.iter().any(|t| {
            t.to == to
                && self.is_intact(t)
                && (t.is_global() || t.from.as_deref() == Some(from))
        })
    }

    /// Legal targets from `from`, in status definition order, excluding `from`.
    pub fn available_targets(&self, from: &str) -> Vec<&Status> {
        self.statuses
            .iter()
            .filter(|s| s.id != from && self.permits(from, &s.id))
            .collect()
    }

    /// Transitions referencing a status the workflow does not define.
    pub fn broken_transitions(&self) -> Vec<&Transition> {
        self.transitions
            .iter()
            .filter(|t| !self.is_intact(t))
            .collect()
    }

    /// Statuses an issue can enter but never leave.
    ///
    /// `done`-category statuses are included; callers decide whether a
    /// terminal status is intended.
    pub fn dead_ends(&self) -> Vec<&Status> {
        self.statuses
            .iter()
            .filter(|s| self.available_targets(&s.id).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Workflow {
        Workflow::new(
            vec![
                Status::new("todo", "To Do", StatusCategory::Todo),
                Status::new("in_progress", "In Progress", StatusCategory::InProgress),
                Status::new("review", "Review", StatusCategory::InProgress),
                Status::new("done", "Done", StatusCategory::Done),
            ],
            vec![
                Transition::new("todo", "in_progress"),
                Transition::new("in_progress", "review"),
                Transition::new("review", "in_progress"),
                Transition::new("review", "done"),
                Transition::new("review", "archived"),
                Transition::new("ghost", "todo"),
            ],
        )
    }

    #[test]
    fn test_permits_direct_edge_only() {
        let wf = sample();
        assert!(wf.permits("todo", "in_progress"));
        assert!(!wf.permits("todo", "done"));
        assert!(!wf.permits("in_progress", "todo"));
    }

    #[test]
    fn test_permits_global_edge_from_any_status() {
        let mut wf = sample();
        wf.transitions.push(Transition::global("todo"));
        assert!(wf.permits("done", "todo"));
        assert!(wf.permits("review", "todo"));
    }

    #[test]
    fn test_broken_transitions_are_reported_and_ignored() {
        let wf = sample();
        let broken: Vec<_> = wf.broken_transitions().iter().map(|t| t.to.as_str()).collect();
        assert_eq!(broken, vec!["archived", "todo"]);
        assert!(!wf.permits("review", "archived"));
        assert!(!wf.permits("ghost", "todo"));
    }

    #[test]
    fn test_global_edge_to_unknown_status_is_broken() {
        let wf = Workflow::new(
            vec![Status::new("todo", "To Do", StatusCategory::Todo)],
            vec![Transition::global("nowhere")],
        );
        assert_eq!(wf.broken_transitions().len(), 1);
    }

    #[test]
    fn test_available_targets_follow_status_order() {
        let wf = sample();
        let targets: Vec<_> = wf.available_targets("review").iter().map(|s| s.id.as_str()).collect();
        assert_eq!(targets, vec!["in_progress", "done"]);
    }

    #[test]
    fn test_dead_ends() {
        let wf = sample();
        let dead: Vec<_> = wf.dead_ends().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(dead, vec!["done"]);
    }

    #[test]
    fn test_category_map() {
        let map = sample().category_map();
        assert_eq!(map.get("review"), Some(&StatusCategory::InProgress));
        assert_eq!(map.len(), 4);
    }
}
