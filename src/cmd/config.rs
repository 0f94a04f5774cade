//! `trackboard config`: show, validate, and write board.toml files.

use std::path::Path;

use anyhow::{Context, Result};

use super::super::ConfigCommands;
use trackboard::config::BoardToml;

pub fn cmd_config(config_path: &Path, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Board Configuration");
            println!("===================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No board config found at {}", config_path.display());
                println!("Using default configuration:");
            }
            println!();

            let toml = BoardToml::load_or_default(config_path)?;
            let config = toml.to_config().context("Invalid board configuration")?;

            println!("[board]");
            println!("  name = \"{}\"", config.name);
            println!("  kind = \"{}\"", config.kind);
            println!("  strict_coverage = {}", toml.strict_coverage());
            println!();

            let plugins: Vec<_> = config.features.enabled_plugins().map(|p| p.as_str()).collect();
            println!("[plugins]");
            println!("  enabled = [{}]", plugins.join(", "));
            println!();

            println!("Statuses:");
            for status in &config.workflow.statuses {
                println!("  {:<14} {:<12} {}", status.id, status.category, status.name);
            }
            println!();

            println!("Transitions:");
            for t in &config.workflow.transitions {
                println!("  {} -> {}", t.from.as_deref().filter(|_| !t.is_global()).unwrap_or("*"), t.to);
            }
            println!();

            println!("Columns:");
            for column in &config.columns {
                let limit = column
                    .max_issues
                    .map(|m| format!(" (max {})", m))
                    .unwrap_or_default();
                println!(
                    "  {:<14} {:<12} [{}]{}",
                    column.id,
                    column.category,
                    column.claimed_statuses().join(", "),
                    limit
                );
            }
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No board config found. Using defaults (valid).");
                return Ok(());
            }

            let toml = BoardToml::load(config_path)?;
            let config = toml.to_config().context("Invalid board configuration")?;
            let warnings = config.warnings();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init { kind, name, force }) => {
            if config_path.exists() && !force {
                println!("Board config already exists at {}", config_path.display());
                println!("Use --force to overwrite it.");
                return Ok(());
            }

            if let Some(parent) = config_path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }

            BoardToml::starter(&name, kind).save(config_path)?;

            println!("Created {} board config at {}", kind, config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [[statuses]] and [[transitions]] for the workflow");
            println!("  - [[columns]] status_ids and max_issues");
            println!("  - [plugins] enabled");
            println!();
        }
    }

    Ok(())
}
