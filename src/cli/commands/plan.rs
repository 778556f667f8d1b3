use clap::Args;

#[derive(Args)]
pub struct PlanArgs {
    /// Ignore any saved draft and start from the first step
    #[arg(long)]
    pub fresh: bool,
}
