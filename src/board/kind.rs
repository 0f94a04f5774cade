use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::features::Plugin;
use crate::models::{Column, StatusCategory};

/// Board shape. One resolver serves all three; the kind only switches
/// default columns and which metrics apply.
///
/// | Kind     | WIP limits | Sprint stats | Plugin needed |
/// |----------|------------|--------------|---------------|
/// | `Basic`  | no         | no           | none          |
/// | `Kanban` | yes        | no           | `kanban`      |
/// | `Scrum`  | no         | yes          | `scrum`       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    #[default]
    Basic,
    Kanban,
    Scrum,
}

impl BoardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Kanban => "kanban",
            Self::Scrum => "scrum",
        }
    }

    pub fn applies_wip_limits(&self) -> bool {
        matches!(self, Self::Kanban)
    }

    pub fn tracks_sprints(&self) -> bool {
        matches!(self, Self::Scrum)
    }

    pub fn required_plugin(&self) -> Option<Plugin> {
        match self {
            Self::Basic => None,
            Self::Kanban => Some(Plugin::Kanban),
            Self::Scrum => Some(Plugin::Scrum),
        }
    }

    /// Columns used when a board configures none of its own.
    pub fn default_columns(&self) -> Vec<Column> {
        let todo = Column::new("todo", "To Do", StatusCategory::Todo);
        let in_progress = Column::new("in_progress", "In Progress", StatusCategory::InProgress);
        let done = Column::new("done", "Done", StatusCategory::Done);
        match self {
            Self::Basic | Self::Scrum => vec![todo, in_progress, done],
            Self::Kanban => vec![
                Column::new("backlog", "Backlog", StatusCategory::Todo),
                todo,
                in_progress.with_max_issues(5),
                Column::new("review", "Review", StatusCategory::InProgress).with_max_issues(3),
                done,
            ],
        }
    }
}

impl FromStr for BoardKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "kanban" => Ok(Self::Kanban),
            "scrum" => Ok(Self::Scrum),
            _ => Err(ConfigError::InvalidBoardKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for BoardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
