//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(name = "arcade", version, about = "Dodge the falling bullets")]
pub struct Config {
    /// Seed for bullet placement; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// How long each tick waits for a key, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub poll_ms: u64,

    /// How long the GAME OVER screen stays up, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub game_over_hold_ms: u64,

    /// Write logs to this file (filtered by RUST_LOG, default `info`)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: None,
            poll_ms: 200,
            game_over_hold_ms: 2000,
            log_file: None,
        }
    }
}

impl Config {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn game_over_hold(&self) -> Duration {
        Duration::from_millis(self.game_over_hold_ms)
    }
}
