//! CLI Module
//!
//! Command-line driver for the Cadenza console core.

pub mod commands;

use clap::{Parser, Subcommand};

/// Cadenza Console - control-surface core for an AI music studio
#[derive(Parser, Debug)]
#[command(name = "cadenza")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the mixer strip with derived effective levels
    #[command(name = "channels")]
    Channels {
        /// Solo these channel ids before printing
        #[arg(long)]
        solo: Vec<String>,

        /// Mute these channel ids before printing
        #[arg(long)]
        mute: Vec<String>,
    },

    /// Drive the granular pad to a position and print the parameter set
    #[command(name = "surface")]
    Surface {
        /// Pad x position, 0-100
        x: i32,

        /// Pad y position, 0-100
        y: i32,
    },

    /// Run a generation request against the mock provider
    #[command(name = "generate")]
    Generate {
        /// What to generate
        prompt: String,

        /// Generation kind: track, video, or stem-split
        #[arg(short, long, default_value = "track")]
        kind: String,

        /// Engine id; defaults to the kind's standard engine
        #[arg(short, long)]
        engine: Option<String>,

        /// Simulated provider delay in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
    },
}
