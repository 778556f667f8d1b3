use clap::{Args, ValueEnum};

#[derive(Args)]
pub struct CatalogArgs {
    /// Which blueprint to show (both, side by side, when omitted)
    #[arg(short, long, value_enum)]
    pub blueprint: Option<CatalogView>,

    /// Include prices and dependencies for every component
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogView {
    Interaction,
    Commerce,
    /// Both blueprints merged into one view
    Universal,
}
