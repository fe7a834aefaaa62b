//! Core type aliases, constants, and configuration for the triples engine.
//!
//! This crate provides the foundational types and tunable parameters
//! shared by the card, gameroom, and binary crates.
mod config;

pub use config::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Index of a slot on the board.
pub type Position = usize;
/// Player index at the table (0-based, also the player's display id).
pub type Seat = usize;
/// Milliseconds, as carried by configuration files and display calls.
pub type Millis = u64;

/// Number of tokens that make up a claim.
pub const TRIPLE: usize = 3;

// ============================================================================
// TABLE PARAMETERS
// ============================================================================
/// Board positions in the classic game.
pub const TABLE_SIZE: usize = 12;
/// Values each card feature can take.
pub const FEATURE_SIZE: usize = 3;
/// Features carried by every card.
pub const FEATURE_COUNT: usize = 4;
/// Cards in a full deck (FEATURE_SIZE ^ FEATURE_COUNT).
pub const DECK_SIZE: usize = 81;

// ============================================================================
// TIMING PARAMETERS
// ============================================================================
/// Round length before the dealer forces a reshuffle.
pub const ROUND_MILLIS: Millis = 60_000;
/// Remaining round time below which the countdown is shown as urgent.
pub const WARNING_MILLIS: Millis = 5_000;
/// Freeze after a successful claim.
pub const REWARD_MILLIS: Millis = 1_000;
/// Freeze after a failed claim.
pub const PENALTY_MILLIS: Millis = 3_000;
/// Visual delay between consecutive card placements.
pub const DEAL_MILLIS: Millis = 100;
/// Refresh increment for countdown and freeze displays.
pub const TICK_MILLIS: Millis = 100;
/// Delay an autopilot inserts between synthetic inputs.
pub const PACE_MILLIS: Millis = 200;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() -> anyhow::Result<()> {
    use anyhow::Context;
    std::fs::create_dir_all("logs").context("create logs directory")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Error)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .context("time moves slow")?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).context("create log file")?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).context("initialize logger")
}
