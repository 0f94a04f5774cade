//! Column coverage analysis.
//!
//! Columns are expected to partition the workflow's statuses. Resolution
//! never enforces that; this module reports where it does not hold so the
//! config loader can warn or, in strict mode, reject.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Column;
use crate::workflow::Workflow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Workflow statuses no column claims.
    pub gaps: Vec<String>,
    /// Statuses claimed by more than one column, with the claiming column ids.
    pub overlaps: BTreeMap<String, Vec<String>>,
    /// Statuses claimed by a column but not defined in the workflow.
    pub unknown: Vec<String>,
}

impl CoverageReport {
    /// Gaps and overlaps only; unknown statuses are harmless to display.
    pub fn is_partition(&self) -> bool {
        self.gaps.is_empty() && self.overlaps.is_empty()
    }
}

pub fn check_coverage(workflow: &Workflow, columns: &[Column]) -> CoverageReport {
    let mut claims: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for column in columns {
        for status in column.claimed_statuses() {
            let owners = claims.entry(status).or_default();
            if !owners.contains(&column.id) {
                owners.push(column.id.clone());
            }
        }
    }

    let gaps = workflow
        .statuses
        .iter()
        .filter(|s| !claims.contains_key(s.id.as_str()))
        .map(|s| s.id.clone())
        .collect();

    let overlaps = claims
        .iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(status, owners)| (status.to_string(), owners.clone()))
        .collect();

    let unknown = claims
        .keys()
        .filter(|status| !workflow.has_status(status))
        .map(|status| status.to_string())
        .collect();

    CoverageReport {
        gaps,
        overlaps,
        unknown,
    }
}
