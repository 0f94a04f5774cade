//! `trackboard board`: filtered column view with WIP and completion stats.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;

use trackboard::board::{
    AssigneeFilter, BoardSession, BoardView, ColumnView, IssueFilter, WipStatus,
};
use trackboard::config::load_board;
use trackboard::load_issues;

pub struct BoardOptions {
    pub search: Option<String>,
    pub assignee: Option<String>,
    pub unassigned: bool,
    pub sprint: Option<String>,
    pub now: DateTime<Utc>,
    pub json: bool,
}

impl BoardOptions {
    fn filter(&self) -> IssueFilter {
        let assignee = match (&self.assignee, self.unassigned) {
            (Some(name), _) => AssigneeFilter::User(name.clone()),
            (None, true) => AssigneeFilter::Unassigned,
            (None, false) => AssigneeFilter::Any,
        };
        let mut filter = IssueFilter::new().with_assignee(assignee);
        if let Some(q) = &self.search {
            filter = filter.with_search(q);
        }
        if let Some(sprint) = &self.sprint {
            filter = filter.with_sprint(sprint);
        }
        filter
    }
}

pub fn cmd_board(config_path: &Path, issues_path: &Path, opts: &BoardOptions) -> Result<()> {
    let config = load_board(config_path)?;
    let issues = load_issues(issues_path)?;
    let session = BoardSession::new(config, issues);
    let view = session.view(&opts.filter(), opts.now);

    if opts.json {
        let out = serde_json::to_string_pretty(&view).context("Failed to serialize board")?;
        println!("{}", out);
        return Ok(());
    }

    print_board(&view);
    Ok(())
}

fn wip_label(col: &ColumnView<'_>) -> String {
    let count = match col.column.max_issues {
        Some(max) => format!("[{}/{}]", col.count(), max),
        None => format!("[{}]", col.count()),
    };
    match col.wip {
        WipStatus::Normal => count,
        WipStatus::Warning => format!("{} {}", count, style("warning").yellow()),
        WipStatus::Exceeded => format!("{} {}", count, style("exceeded").red().bold()),
    }
}

fn print_board(view: &BoardView<'_>) {
    println!();
    println!("{} ({})", style(view.name).bold(), view.kind);
    println!();

    for col in &view.columns {
        let mut header = format!("{} {}", style(&col.column.name).cyan().bold(), wip_label(col));
        if col.below_minimum {
            header.push_str(&format!(" {}", style("below minimum").dim()));
        }
        println!("{}", header);

        if col.issues.is_empty() {
            println!("  {}", style("(empty)").dim());
        }
        for issue in &col.issues {
            let mut line = format!("  {:<10} {}", issue.id, issue.title);
            if let Some(assignee) = &issue.assignee {
                line.push_str(&format!("  @{}", assignee));
            }
            if let Some(points) = issue.story_points {
                line.push_str(&format!("  {}pt", points));
            }
            println!("{}", line);
        }
        println!();
    }

    println!(
        "Total {} · WIP {} · Completed this week {}",
        view.stats.total_issues, view.stats.wip_issues, view.stats.completed_this_week
    );
    if let Some(sprint) = &view.sprint {
        println!(
            "Sprint: {}/{} issues, {}/{} points ({:.0}%)",
            sprint.completed_issues,
            sprint.total_issues,
            sprint.completed_points,
            sprint.total_points,
            sprint.point_progress() * 100.0
        );
    }
    println!();
}
