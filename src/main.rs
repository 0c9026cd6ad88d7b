use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use two_kings::config::RuleSet;
use two_kings::console::ConsoleHandler;

/// Two-player chess at the console.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Allow castling out of check and across attacked squares.
    #[arg(long)]
    lenient_castling: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rules = if cli.lenient_castling {
        RuleSet::lenient_castling()
    } else {
        RuleSet::new()
    };
    info!(?rules, "starting game");

    let mut console = ConsoleHandler::new(rules);
    console.run()
}
