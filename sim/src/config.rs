use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use hotel_common::{SessionConfig, constants::DEFAULT_EMPTY_RATIO, levels::SelectionMode};

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Selection {
    // First entries of the catalog, in catalog order
    Prefix,
    // Weighted draw without replacement
    Weighted,
}

impl From<Selection> for SelectionMode {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::Prefix => Self::Prefix,
            Selection::Weighted => Self::Weighted,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless hotel simulation", long_about = None)]
pub struct Args {
    // Simulation loop frequency in Hz
    #[arg(long, default_value_t = 60)]
    pub frequency: u64,

    // Stop after this many ticks (0 runs forever)
    #[arg(long, default_value_t = 0)]
    pub ticks: u64,

    // Run ticks back to back instead of pacing them at the loop frequency
    #[arg(long, default_value_t = false)]
    pub fast: bool,

    // Number of guest rooms in play
    #[arg(long, default_value_t = hotel_common::constants::ROOM_COUNT)]
    pub rooms: usize,

    // Share of rooms left without an encounter
    #[arg(long, default_value_t = DEFAULT_EMPTY_RATIO)]
    pub empty_ratio: f32,

    // How encounters are picked from the catalog
    #[arg(long, value_enum, default_value_t = Selection::Prefix)]
    pub selection: Selection,

    // Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    // JSON level catalog to use instead of the builtin one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    // Chance per room that the autopilot ignores the room's rule
    #[arg(long, default_value_t = 0.0)]
    pub careless: f32,

    // Seconds between a death and the automatic restart
    #[arg(long, default_value_t = 2.0)]
    pub restart_delay: f32,

    // Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_filter: String,
}

impl Args {
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            room_count: self.rooms,
            empty_ratio: self.empty_ratio,
            selection: self.selection.into(),
            seed: self.seed,
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_session_defaults() {
        let args = Args::parse_from(["hotel-sim"]);
        assert_eq!(args.session_config(), SessionConfig::default());
        assert_eq!(args.frequency, 60);
    }

    #[test]
    fn selection_and_seed_are_forwarded() {
        let args = Args::parse_from(["hotel-sim", "--selection", "weighted", "--seed", "7", "--rooms", "4"]);
        let config = args.session_config();
        assert_eq!(config.selection, SelectionMode::Weighted);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.room_count, 4);
    }
}
