use super::*;
use anyhow::Context;
use std::path::Path;
use std::time::Duration;

/// Game parameters.
///
/// Deserializes from JSON where every field is optional; missing fields
/// fall back to the classic game's values.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub humans: usize,
    pub computers: usize,
    pub table_size: usize,
    pub feature_size: usize,
    pub feature_count: usize,
    pub deck_size: usize,
    pub round_ms: Millis,
    pub warning_ms: Millis,
    pub reward_ms: Millis,
    pub penalty_ms: Millis,
    pub deal_ms: Millis,
    pub tick_ms: Millis,
    pub pace_ms: Millis,
    pub hints: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            humans: 0,
            computers: 2,
            table_size: TABLE_SIZE,
            feature_size: FEATURE_SIZE,
            feature_count: FEATURE_COUNT,
            deck_size: DECK_SIZE,
            round_ms: ROUND_MILLIS,
            warning_ms: WARNING_MILLIS,
            reward_ms: REWARD_MILLIS,
            penalty_ms: PENALTY_MILLIS,
            deal_ms: DEAL_MILLIS,
            tick_ms: TICK_MILLIS,
            pace_ms: PACE_MILLIS,
            hints: false,
        }
    }
}

impl Config {
    /// Reads a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = serde_json::from_str::<Self>(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
    /// Rejects parameter combinations the engine cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.players() > 0, "table needs at least one player");
        anyhow::ensure!(
            self.table_size >= TRIPLE,
            "table of {} positions cannot hold a triple",
            self.table_size
        );
        anyhow::ensure!(self.feature_size > 1, "features need at least two values");
        anyhow::ensure!(
            self.deck_size <= self.feature_space(),
            "deck of {} exceeds the {} distinct cards",
            self.deck_size,
            self.feature_space()
        );
        anyhow::ensure!(self.tick_ms > 0, "tick must be positive");
        Ok(())
    }
    /// Total number of players, humans first.
    pub fn players(&self) -> usize {
        self.humans + self.computers
    }
    /// Whether the player at `seat` is driven by external input.
    pub fn is_human(&self, seat: Seat) -> bool {
        seat < self.humans
    }
    /// Number of distinct cards the feature encoding can express.
    pub fn feature_space(&self) -> usize {
        (0..self.feature_count).fold(1usize, |n, _| n.saturating_mul(self.feature_size))
    }
    pub fn round(&self) -> Duration {
        Duration::from_millis(self.round_ms)
    }
    pub fn warning(&self) -> Duration {
        Duration::from_millis(self.warning_ms)
    }
    pub fn reward(&self) -> Duration {
        Duration::from_millis(self.reward_ms)
    }
    pub fn penalty(&self) -> Duration {
        Duration::from_millis(self.penalty_ms)
    }
    pub fn deal(&self) -> Duration {
        Duration::from_millis(self.deal_ms)
    }
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }
}
