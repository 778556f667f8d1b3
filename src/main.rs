use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;

mod cli;
mod commands;

use cli::Cli;
use cli::app::Commands;
use cli::commands::config::ConfigSubcommands;
use cli::commands::draft::DraftSubcommands;
use project_planner::config::PlannerConfig;
use project_planner::planner::PlannerCatalog;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("project-planner.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting project-planner");

    let config = PlannerConfig::load()?;
    let catalog = Arc::new(PlannerCatalog::builtin()?);

    match cli.command {
        Commands::Catalog(args) => commands::catalog::catalog_command(&catalog, args),
        Commands::Services => commands::services::services_command(&catalog),
        Commands::Estimate(args) => {
            commands::estimate::estimate_command(catalog, config, args).await
        }
        Commands::Plan(args) => commands::plan::plan_command(catalog, config, args).await,
        Commands::Draft(args) => match args.command {
            DraftSubcommands::Show => commands::draft::show_command(catalog, config),
            DraftSubcommands::Clear => commands::draft::clear_command(&config),
        },
        Commands::Quote(args) => commands::quote::quote_command(catalog, config, args).await,
        Commands::Config(args) => match args.command {
            ConfigSubcommands::Show => commands::settings::show_command(&config),
            ConfigSubcommands::Path => commands::settings::path_command(),
            ConfigSubcommands::Set { name, value } => {
                commands::settings::set_command(config, name, value)
            }
        },
    }
}
