//! Board configuration file (`board.toml`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [board]
//! name = "Platform"
//! kind = "kanban"
//! strict_coverage = false
//!
//! [plugins]
//! enabled = ["kanban", "reports"]
//!
//! [[statuses]]
//! id = "todo"
//! name = "To Do"
//! category = "todo"
//!
//! [[statuses]]
//! id = "review"
//! category = "in_progress"
//!
//! [[transitions]]
//! from = "todo"
//! to = "review"
//!
//! [[transitions]]
//! to = "todo"
//! global = true
//!
//! [[columns]]
//! id = "review"
//! name = "Review"
//! category = "in_progress"
//! status_ids = ["review", "qa"]
//! max_issues = 4
//! ```
//!
//! Omitted sections fall back to the board kind: no `[[columns]]` means the
//! kind's default columns, and no `[plugins]` enables just the kind's plugin.
//! Without `[[statuses]]` the columns' statuses are used; if `[[transitions]]`
//! is also absent, every status is reachable from anywhere.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::board::{BoardConfig, BoardKind, CoverageReport, column_statuses, open_workflow};
use crate::errors::ConfigError;
use crate::features::FeatureGates;
use crate::models::{Column, Status, Transition};
use crate::workflow::Workflow;

/// Environment variable that forces strict coverage regardless of the file.
pub const STRICT_COVERAGE_ENV: &str = "TRACKBOARD_STRICT_COVERAGE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSection {
    #[serde(default = "default_board_name")]
    pub name: String,
    #[serde(default)]
    pub kind: BoardKind,
    /// Reject boards whose columns do not partition the workflow statuses.
    #[serde(default)]
    pub strict_coverage: bool,
}

fn default_board_name() -> String {
    "Board".to_string()
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            name: default_board_name(),
            kind: BoardKind::default(),
            strict_coverage: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginsSection {
    #[serde(default)]
    pub enabled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_issues: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_issues: Option<usize>,
}

impl StatusEntry {
    fn to_status(&self) -> Result<Status, ConfigError> {
        Ok(Status {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            category: self.category.parse()?,
        })
    }
}

impl ColumnEntry {
    fn to_column(&self) -> Result<Column, ConfigError> {
        Ok(Column {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            category: self.category.parse()?,
            status_ids: self.status_ids.clone(),
            min_issues: self.min_issues,
            max_issues: self.max_issues,
        })
    }
}

impl From<&Column> for ColumnEntry {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id.clone(),
            name: Some(column.name.clone()),
            category: column.category.as_str().to_string(),
            status_ids: column.status_ids.clone(),
            min_issues: column.min_issues,
            max_issues: column.max_issues,
        }
    }
}

/// The complete board.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardToml {
    #[serde(default)]
    pub board: BoardSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginsSection>,
    #[serde(default)]
    pub statuses: Vec<StatusEntry>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub columns: Vec<ColumnEntry>,
}

impl BoardToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board config: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse board.toml")
    }

    /// Returns the default configuration if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize board.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write board config: {}", path.display()))?;
        Ok(())
    }

    /// A fully spelled-out starter file for `kind`.
    pub fn starter(name: &str, kind: BoardKind) -> Self {
        let config = BoardConfig::new(name, kind);
        Self {
            board: BoardSection {
                name: name.to_string(),
                kind,
                strict_coverage: false,
            },
            plugins: Some(PluginsSection {
                enabled: config
                    .features
                    .enabled_plugins()
                    .map(|p| p.as_str().to_string())
                    .collect(),
            }),
            statuses: config
                .workflow
                .statuses
                .iter()
                .map(|s| StatusEntry {
                    id: s.id.clone(),
                    name: Some(s.name.clone()),
                    category: s.category.as_str().to_string(),
                })
                .collect(),
            transitions: config.workflow.transitions.clone(),
            columns: config.columns.iter().map(ColumnEntry::from).collect(),
        }
    }

    /// Strict coverage from the file, or forced on by the environment.
    pub fn strict_coverage(&self) -> bool {
        self.board.strict_coverage
            || std::env::var(STRICT_COVERAGE_ENV)
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
    }

    /// Build the runtime board, applying kind defaults for omitted sections.
    ///
    /// Coverage problems are logged, or rejected under strict coverage.
    pub fn to_config(&self) -> Result<BoardConfig, ConfigError> {
        let kind = self.board.kind;

        let columns = if self.columns.is_empty() {
            kind.default_columns()
        } else {
            let mut seen = HashSet::new();
            self.columns
                .iter()
                .map(|entry| {
                    if !seen.insert(entry.id.as_str()) {
                        return Err(ConfigError::DuplicateColumn(entry.id.clone()));
                    }
                    entry.to_column()
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let workflow = if self.statuses.is_empty() && self.transitions.is_empty() {
            open_workflow(&columns)
        } else if self.statuses.is_empty() {
            Workflow::new(column_statuses(&columns), self.transitions.clone())
        } else {
            let mut seen = HashSet::new();
            let statuses = self
                .statuses
                .iter()
                .map(|entry| {
                    if !seen.insert(entry.id.as_str()) {
                        return Err(ConfigError::DuplicateStatus(entry.id.clone()));
                    }
                    entry.to_status()
                })
                .collect::<Result<Vec<_>, _>>()?;
            Workflow::new(statuses, self.transitions.clone())
        };

        let features = match &self.plugins {
            Some(section) => FeatureGates::from_names(&section.enabled)?,
            None => FeatureGates::new(kind.required_plugin()),
        };

        let config = BoardConfig {
            name: self.board.name.clone(),
            kind,
            workflow,
            columns,
            features,
        };

        let report = config.coverage();
        if !report.is_partition() {
            if self.strict_coverage() {
                return Err(ConfigError::Coverage {
                    gaps: report.gaps.len(),
                    overlaps: report.overlaps.len(),
                });
            }
            log_coverage(&config.name, &report);
        }
        for t in config.workflow.broken_transitions() {
            tracing::warn!(
                board = %config.name,
                from = t.from.as_deref().unwrap_or("*"),
                to = %t.to,
                "transition references an undefined status and will be ignored"
            );
        }

        Ok(config)
    }
}

fn log_coverage(board: &str, report: &CoverageReport) {
    for status in &report.gaps {
        tracing::warn!(board, status = %status, "no column claims status; its issues will not be shown");
    }
    for (status, columns) in &report.overlaps {
        tracing::warn!(
            board,
            status = %status,
            columns = %columns.join(","),
            "status claimed by several columns; its issues will appear in each"
        );
    }
}

/// Load and build a board in one step.
pub fn load_board(path: &Path) -> Result<BoardConfig> {
    let toml = BoardToml::load(path)?;
    toml.to_config()
        .with_context(|| format!("Invalid board config: {}", path.display()))
}
