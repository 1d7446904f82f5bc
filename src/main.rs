use clap::Parser;
use post_webhook::structs::cli::Cli;
use post_webhook::workers::command_runner::CommandRunner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    CommandRunner::new().run_command(cli.command).await
}
