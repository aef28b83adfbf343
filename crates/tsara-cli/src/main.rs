//! Tsara terminal client entry point.
//!
//! Binary name: `tsara`
//!
//! Parses CLI arguments, loads configuration, then runs the interactive chat
//! (the default) or a one-shot command against the answer service.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,tsara=debug",
        _ => "trace",
    };

    // Replies go to stdout, so logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Chat);

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "tsara", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.base_url.as_deref()).await?;

    match command {
        Commands::Chat => {
            cli::chat::loop_runner::run_chat_loop(&state).await?;
        }
        Commands::Ask { question } => {
            cli::ask::ask(&state, &question.join(" "), cli.json).await?;
        }
        Commands::Health => {
            cli::health::health(&state, cli.json).await?;
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
