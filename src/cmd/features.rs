//! `trackboard features`: per-feature gate state for the configured plugins.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use trackboard::config::BoardToml;
use trackboard::features::Feature;

pub fn cmd_features(config_path: &Path) -> Result<()> {
    let toml = BoardToml::load_or_default(config_path)?;
    let config = toml.to_config().context("Invalid board configuration")?;

    println!();
    println!("Features for {}:", style(&config.name).bold());
    for feature in Feature::ALL {
        let plugin = feature
            .required_plugin()
            .map(|p| p.as_str())
            .unwrap_or("-");
        let state = if config.features.is_enabled(feature) {
            style("on ").green()
        } else {
            style("off").dim()
        };
        println!("  {} {:<20} {}", state, feature.as_str(), plugin);
    }
    println!();
    Ok(())
}
