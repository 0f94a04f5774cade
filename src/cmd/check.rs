//! `trackboard check-move`: validate a single drop against the workflow.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use trackboard::board::{BoardSession, drop_status_id};
use trackboard::config::load_board;
use trackboard::load_issues;
use trackboard::workflow::Verdict;

pub enum MoveTarget {
    Status(String),
    Column(String),
}

#[derive(Serialize)]
struct CheckReport<'a> {
    issue: &'a str,
    from: Option<&'a str>,
    to: &'a str,
    #[serde(flatten)]
    verdict: &'a Verdict,
}

/// Returns whether the move is allowed.
pub fn cmd_check_move(
    config_path: &Path,
    issues_path: &Path,
    issue_id: &str,
    target: &MoveTarget,
    json: bool,
) -> Result<bool> {
    let config = load_board(config_path)?;
    let issues = load_issues(issues_path)?;
    let session = BoardSession::new(config, issues);

    let to_status = match target {
        MoveTarget::Status(status) => status.clone(),
        MoveTarget::Column(column_id) => {
            let column = session
                .config()
                .column(column_id)
                .with_context(|| format!("Column '{}' not found", column_id))?;
            drop_status_id(column).to_string()
        }
    };

    let validator = session.validator();
    let verdict = validator.validate(issue_id, &to_status);
    let from = validator.current_status(issue_id);

    if json {
        let report = CheckReport {
            issue: issue_id,
            from,
            to: &to_status,
            verdict: &verdict,
        };
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize verdict")?;
        println!("{}", out);
        return Ok(verdict.is_allowed());
    }

    let from = from.unwrap_or("?");
    match verdict.reason() {
        None => println!(
            "{} {}: {} -> {}",
            style("allowed").green().bold(),
            issue_id,
            from,
            to_status
        ),
        Some(reason) => println!(
            "{} {}: {} -> {} ({})",
            style("denied").red().bold(),
            issue_id,
            from,
            to_status,
            reason
        ),
    }

    Ok(verdict.is_allowed())
}
