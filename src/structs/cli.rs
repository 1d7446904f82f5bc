use clap::Parser;
use crate::enums::commands::Commands;

#[derive(Parser)]
#[clap(name = "post-webhook")]
#[clap(about = "Send notes to webhooks and route the responses back into the vault", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
