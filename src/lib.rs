pub mod board;
pub mod config;
pub mod errors;
pub mod features;
pub mod models;
pub mod optimistic;
pub mod workflow;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Read an issue list exported from the backing store as a JSON array.
/// Issue ids must be unique.
pub fn load_issues(path: &Path) -> Result<Vec<models::Issue>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read issues file: {}", path.display()))?;
    let issues: Vec<models::Issue> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse issues file: {}", path.display()))?;

    let mut seen = HashSet::new();
    if let Some(dup) = issues.iter().find(|i| !seen.insert(i.id.as_str())) {
        bail!("Duplicate issue id '{}' in {}", dup.id, path.display());
    }
    Ok(issues)
}
