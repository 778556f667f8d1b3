use super::commands::catalog::CatalogArgs;
use super::commands::config::ConfigCommands;
use super::commands::draft::DraftCommands;
use super::commands::estimate::EstimateArgs;
use super::commands::plan::PlanArgs;
use super::commands::quote::QuoteArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "project-planner")]
#[command(about = "Plan a software project module by module and get an instant estimate")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the grouped component catalog
    Catalog(CatalogArgs),
    /// List industries and the services offered in each
    Services,
    /// Estimate a configuration without the interactive wizard
    Estimate(EstimateArgs),
    /// Run the interactive planner wizard
    Plan(PlanArgs),
    /// Inspect or discard the saved draft
    Draft(DraftCommands),
    /// Request a callback with a quote summary
    Quote(QuoteArgs),
    /// Planner configuration
    Config(ConfigCommands),
}
