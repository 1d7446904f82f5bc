use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample configuration file
    Init,
    /// List configured webhooks
    List,
    /// Check the configuration for problems
    Validate,
    /// Add a webhook with default settings
    Add {
        #[clap(short, long)]
        name: String,
        #[clap(short, long, default_value = "")]
        url: String,
    },
    /// Remove a webhook by id
    Remove {
        id: String,
    },
    /// Import webhooks from the plugin's data.json
    Import {
        path: PathBuf,
    },
    /// Send a note to a webhook
    Send {
        #[clap(short, long)]
        webhook: String,
        #[clap(short, long)]
        note: String,
        #[clap(short, long)]
        selection: Option<String>,
        #[clap(long)]
        vault: Option<PathBuf>,
    },
    /// Send a test payload to a webhook
    Test {
        #[clap(short, long)]
        webhook: String,
    },
}
