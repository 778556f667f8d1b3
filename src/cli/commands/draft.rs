use clap::{Args, Subcommand};

#[derive(Args)]
pub struct DraftCommands {
    #[command(subcommand)]
    pub command: DraftSubcommands,
}

#[derive(Subcommand)]
pub enum DraftSubcommands {
    /// Show the saved draft and whether it can still be resumed
    Show,
    /// Delete the saved draft
    Clear,
}
