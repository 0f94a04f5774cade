use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub type IssueId = String;
pub type StatusId = String;

/// Coarse grouping of statuses. The only dimension progress math looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Todo,
    InProgress,
    Done,
}

impl StatusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl FromStr for StatusCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ConfigError::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: StatusId,
    pub name: String,
    pub category: StatusCategory,
}

impl Status {
    pub fn new(id: &str, name: &str, category: StatusCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
        }
    }
}

/// A directed workflow edge.
///
/// A transition with `global = true`, or with no `from`, is allowed from
/// every status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<StatusId>,
    pub to: StatusId,
    #[serde(default)]
    pub global: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Transition {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: Some(from.to_string()),
            to: to.to_string(),
            global: false,
            name: None,
        }
    }

    pub fn global(to: &str) -> Self {
        Self {
            from: None,
            to: to.to_string(),
            global: true,
            name: None,
        }
    }

    pub fn is_global(&self) -> bool {
        self.global || self.from.is_none()
    }
}

/// A board column. Without `status_ids` the column claims the single status
/// whose id equals the column id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub category: StatusCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_ids: Vec<StatusId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_issues: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_issues: Option<usize>,
}

impl Column {
    pub fn new(id: &str, name: &str, category: StatusCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            status_ids: Vec::new(),
            min_issues: None,
            max_issues: None,
        }
    }

    pub fn with_statuses(mut self, status_ids: &[&str]) -> Self {
        self.status_ids = status_ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_max_issues(mut self, max: usize) -> Self {
        self.max_issues = Some(max);
        self
    }

    pub fn with_min_issues(mut self, min: usize) -> Self {
        self.min_issues = Some(min);
        self
    }

    /// Status ids this column claims, in configured order.
    pub fn claimed_statuses(&self) -> Vec<&str> {
        if self.status_ids.is_empty() {
            vec![self.id.as_str()]
        } else {
            self.status_ids.iter().map(String::as_str).collect()
        }
    }

    pub fn below_minimum(&self, count: usize) -> bool {
        self.min_issues.is_some_and(|min| count < min)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    #[serde(default)]
    pub title: String,
    pub status: StatusId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    pub fn new(id: &str, status: &str, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            title: String::new(),
            status: status.to_string(),
            story_points: None,
            assignee: None,
            sprint_id: None,
            updated_at,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_assignee(mut self, assignee: &str) -> Self {
        self.assignee = Some(assignee.to_string());
        self
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.story_points = Some(points);
        self
    }
}
