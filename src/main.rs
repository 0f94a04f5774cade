use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use trackboard::board::BoardKind;

mod cmd;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "TRACKBOARD_LOG";

#[derive(Parser)]
#[command(name = "trackboard")]
#[command(version, about = "Issue board resolver and workflow transition checker")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the board: columns, WIP state, and statistics
    Board {
        /// Path to the board configuration
        #[arg(short, long, default_value = "board.toml")]
        config: PathBuf,

        /// Path to the issues JSON file
        #[arg(short, long)]
        issues: PathBuf,

        /// Case-insensitive search over issue id and title
        #[arg(long)]
        search: Option<String>,

        /// Only show issues assigned to this user
        #[arg(long, conflicts_with = "unassigned")]
        assignee: Option<String>,

        /// Only show unassigned issues
        #[arg(long)]
        unassigned: bool,

        /// Only show issues in this sprint
        #[arg(long)]
        sprint: Option<String>,

        /// Reference time for "completed this week" (RFC 3339, default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Print the resolved board as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether an issue may move to a status or column
    #[command(group(ArgGroup::new("target").required(true).args(["status", "column"])))]
    CheckMove {
        /// Path to the board configuration
        #[arg(short, long, default_value = "board.toml")]
        config: PathBuf,

        /// Path to the issues JSON file
        #[arg(short, long)]
        issues: PathBuf,

        /// Issue id to move
        #[arg(long)]
        issue: String,

        /// Target status id
        #[arg(long)]
        status: Option<String>,

        /// Target column id (resolves to the column's first status)
        #[arg(long)]
        column: Option<String>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },
    /// View, validate, or initialize board configuration
    Config {
        /// Path to the board configuration
        #[arg(short, long, global = true, default_value = "board.toml")]
        config: PathBuf,

        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// List features enabled by the configured plugins
    Features {
        /// Path to the board configuration
        #[arg(short, long, default_value = "board.toml")]
        config: PathBuf,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective board configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a starter board.toml
    Init {
        /// Board kind: basic, kanban, scrum
        #[arg(long, default_value = "basic")]
        kind: BoardKind,

        /// Board name
        #[arg(long, default_value = "Board")]
        name: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Board {
            config,
            issues,
            search,
            assignee,
            unassigned,
            sprint,
            now,
            json,
        } => {
            let opts = cmd::BoardOptions {
                search,
                assignee,
                unassigned,
                sprint,
                now: now.unwrap_or_else(Utc::now),
                json,
            };
            cmd::cmd_board(&config, &issues, &opts)?;
        }
        Commands::CheckMove {
            config,
            issues,
            issue,
            status,
            column,
            json,
        } => {
            let target = match (status, column) {
                (Some(status), _) => cmd::MoveTarget::Status(status),
                (None, Some(column)) => cmd::MoveTarget::Column(column),
                (None, None) => anyhow::bail!("Either --status or --column is required"),
            };
            let allowed = cmd::cmd_check_move(&config, &issues, &issue, &target, json)?;
            if !allowed {
                std::process::exit(1);
            }
        }
        Commands::Config { config, command } => cmd::cmd_config(&config, command)?,
        Commands::Features { config } => cmd::cmd_features(&config)?,
    }

    Ok(())
}
