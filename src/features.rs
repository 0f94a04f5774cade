//! Plugin-driven feature gates.
//!
//! Every [`Feature`] maps to at most one [`Plugin`] through an exhaustive
//! `match`, so adding a feature without deciding its gate fails to compile.
//! Features with no plugin are always on.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plugin {
    Kanban,
    Scrum,
    CustomFields,
    Compliance,
    LdapSync,
    Reports,
}

impl Plugin {
    pub const ALL: [Plugin; 6] = [
        Plugin::Kanban,
        Plugin::Scrum,
        Plugin::CustomFields,
        Plugin::Compliance,
        Plugin::LdapSync,
        Plugin::Reports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kanban => "kanban",
            Self::Scrum => "scrum",
            Self::CustomFields => "custom_fields",
            Self::Compliance => "compliance",
            Self::LdapSync => "ldap_sync",
            Self::Reports => "reports",
        }
    }
}

impl FromStr for Plugin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Plugin::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPlugin(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    BasicBoard,
    KanbanBoard,
    WipLimits,
    ScrumBoard,
    Sprints,
    Backlog,
    CustomFields,
    AuditLog,
    ComplianceReports,
    LdapSync,
    Dashboards,
    BurndownChart,
}

impl Feature {
    pub const ALL: [Feature; 12] = [
        Feature::BasicBoard,
        Feature::KanbanBoard,
        Feature::WipLimits,
        Feature::ScrumBoard,
        Feature::Sprints,
        Feature::Backlog,
        Feature::CustomFields,
        Feature::AuditLog,
        Feature::ComplianceReports,
        Feature::LdapSync,
        Feature::Dashboards,
        Feature::BurndownChart,
    ];

    pub fn required_plugin(&self) -> Option<Plugin> {
        match self {
            Feature::BasicBoard => None,
            Feature::KanbanBoard | Feature::WipLimits => Some(Plugin::Kanban),
            Feature::ScrumBoard | Feature::Sprints | Feature::Backlog => Some(Plugin::Scrum),
            Feature::CustomFields => Some(Plugin::CustomFields),
            Feature::AuditLog | Feature::ComplianceReports => Some(Plugin::Compliance),
            Feature::LdapSync => Some(Plugin::LdapSync),
            Feature::Dashboards | Feature::BurndownChart => Some(Plugin::Reports),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::BasicBoard => "basic_board",
            Feature::KanbanBoard => "kanban_board",
            Feature::WipLimits => "wip_limits",
            Feature::ScrumBoard => "scrum_board",
            Feature::Sprints => "sprints",
            Feature::Backlog => "backlog",
            Feature::CustomFields => "custom_fields",
            Feature::AuditLog => "audit_log",
            Feature::ComplianceReports => "compliance_reports",
            Feature::LdapSync => "ldap_sync",
            Feature::Dashboards => "dashboards",
            Feature::BurndownChart => "burndown_chart",
        }
    }
}

/// The set of enabled plugins, queried per feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureGates {
    enabled: BTreeSet<Plugin>,
}

impl FeatureGates {
    pub fn new<I: IntoIterator<Item = Plugin>>(plugins: I) -> Self {
        Self {
            enabled: plugins.into_iter().collect(),
        }
    }

    /// Parse plugin names as they appear in configuration.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        names
            .iter()
            .map(|n| n.as_ref().parse::<Plugin>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|enabled| Self { enabled })
    }

    pub fn plugin_enabled(&self, plugin: Plugin) -> bool {
        self.enabled.contains(&plugin)
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        feature
            .required_plugin()
            .is_none_or(|plugin| self.plugin_enabled(plugin))
    }

    pub fn enabled_plugins(&self) -> impl Iterator<Item = Plugin> + '_ {
        self.enabled.iter().copied()
    }

    pub fn enabled_features(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| self.is_enabled(*f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_plugins_only_basic_board() {
        let gates = FeatureGates::default();
        assert_eq!(gates.enabled_features(), vec![Feature::BasicBoard]);
    }

    #[test]
    fn test_kanban_plugin_enables_wip_limits() {
        let gates = FeatureGates::new([Plugin::Kanban]);
        assert!(gates.is_enabled(Feature::KanbanBoard));
        assert!(gates.is_enabled(Feature::WipLimits));
        assert!(!gates.is_enabled(Feature::Sprints));
    }

    #[test]
    fn test_all_plugins_enable_every_feature() {
        let gates = FeatureGates::new(Plugin::ALL);
        assert_eq!(gates.enabled_features().len(), Feature::ALL.len());
    }

    #[test]
    fn test_every_plugin_gates_some_feature() {
        for plugin in Plugin::ALL {
            assert!(
                Feature::ALL.iter().any(|f| f.required_plugin() == Some(plugin)),
                "plugin {} gates nothing",
                plugin.as_str()
            );
        }
    }

    #[test]
    fn test_from_names() {
        let gates = FeatureGates::from_names(&["scrum", "reports"]).unwrap();
        assert!(gates.is_enabled(Feature::BurndownChart));
        assert!(gates.is_enabled(Feature::Backlog));
        assert!(!gates.is_enabled(Feature::LdapSync));
    }

    #[test]
    fn test_from_names_rejects_unknown_plugin() {
        let err = FeatureGates::from_names(&["scrum", "time_travel"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlugin(ref p) if p == "time_travel"));
    }

    #[test]
    fn test_gates_deserialize_from_plugin_list() {
        let gates: FeatureGates = serde_json::from_str(r#"["compliance","ldap_sync"]"#).unwrap();
        assert!(gates.is_enabled(Feature::AuditLog));
        assert!(gates.plugin_enabled(Plugin::LdapSync));
    }
}
