//! Cadenza CLI - Console Core Driver
//!
//! Command-line driver for the Cadenza control-surface core.

use clap::Parser;
use env_logger::Env;
use log::info;

use cadenza::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Cadenza Console v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd)?,
        None => {
            println!("Cadenza Console v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
        }
    }
    Ok(())
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Channels { solo, mute } => commands::channels(&solo, &mute)?,
        Commands::Surface { x, y } => commands::surface(x, y)?,
        Commands::Generate {
            prompt,
            kind,
            engine,
            delay_ms,
        } => commands::generate(&prompt, &kind, engine.as_deref(), delay_ms)?,
    }
    Ok(())
}
