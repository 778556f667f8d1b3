use anyhow::{Context, Result};
use colored::*;
use log::info;
use project_planner::config::PlannerConfig;

pub fn show_command(config: &PlannerConfig) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;
    println!("{}", content);
    Ok(())
}

pub fn path_command() -> Result<()> {
    println!("{}", PlannerConfig::get_config_path()?.display());
    Ok(())
}

pub fn set_command(mut config: PlannerConfig, name: String, value: String) -> Result<()> {
    info!("Setting {} to {}", name, value);

    config.set_value(&name, &value)?;
    config.save()?;

    println!("{} Set {} to {}", "✓".green(), name.bold(), value);
    Ok(())
}
