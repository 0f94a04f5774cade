//! Issue filters applied before column membership.
//!
//! Order is fixed: text search, then assignee, then sprint. Column
//! membership runs on the result (see [`super::resolver::column_issues`]).

use crate::models::Issue;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssigneeFilter {
    #[default]
    Any,
    Unassigned,
    User(String),
}

impl AssigneeFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        match self {
            AssigneeFilter::Any => true,
            AssigneeFilter::Unassigned => issue.assignee.is_none(),
            AssigneeFilter::User(name) => issue.assignee.as_deref() == Some(name.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    /// Case-insensitive substring matched against issue id and title.
    pub search: Option<String>,
    pub assignee: AssigneeFilter,
    /// Restrict to one sprint, as a Scrum board does for its active sprint.
    pub sprint: Option<String>,
}

impl IssueFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str) -> Self {
        let query = query.trim();
        self.search = (!query.is_empty()).then(|| query.to_lowercase());
        self
    }

    pub fn with_assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = assignee;
        self
    }

    pub fn with_sprint(mut self, sprint_id: &str) -> Self {
        self.sprint = Some(sprint_id.to_string());
        self
    }

    fn matches_sprint(&self, issue: &Issue) -> bool {
        self.sprint
            .as_deref()
            .is_none_or(|sprint| issue.sprint_id.as_deref() == Some(sprint))
    }

    fn matches_search(&self, issue: &Issue) -> bool {
        match &self.search {
            None => true,
            Some(q) => {
                issue.title.to_lowercase().contains(q) || issue.id.to_lowercase().contains(q)
            }
        }
    }

    /// Apply search, assignee, then sprint; input order is preserved.
    pub fn apply<'a>(&self, issues: &'a [Issue]) -> Vec<&'a Issue> {
        issues
            .iter()
            .filter(|i| self.matches_search(i))
            .filter(|i| self.assignee.matches(i))
            .filter(|i| self.matches_sprint(i))
            .collect()
    }
}
