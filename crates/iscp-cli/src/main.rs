mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let ctx = commands::Context::new(cli.workdir, cli.config)?;

    match cli.command {
        cli::Commands::Run { skip_publish, json } => commands::run::handle(&ctx, skip_publish, json),
        cli::Commands::Package { json } => commands::run::handle(&ctx, true, json),
        cli::Commands::Mask {
            input,
            output,
            email_column,
            phone_column,
        } => commands::mask::handle(&ctx, input, output, email_column, phone_column),
        cli::Commands::Publish => commands::publish::handle(&ctx),
        cli::Commands::Init { user } => commands::init::handle(&ctx, user),
        cli::Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
