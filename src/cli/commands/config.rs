use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Set the value of a specific setting
    Set {
        /// Setting name (e.g. commerce-base-price, cascade-policy)
        name: String,
        /// Setting value
        value: String,
    },
}
