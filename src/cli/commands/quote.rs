use clap::Args;

#[derive(Args)]
pub struct QuoteArgs {
    /// Your name
    #[arg(long)]
    pub name: String,

    /// Contact email
    #[arg(long)]
    pub email: String,

    /// Contact phone number
    #[arg(long)]
    pub phone: String,

    /// Service the request is about (defaults to the one in the saved draft)
    #[arg(long)]
    pub service: Option<String>,

    /// Message to send instead of the saved draft's summary
    #[arg(short, long)]
    pub message: Option<String>,
}
