use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;
use tri_core::*;

/// Configuration for the round countdown.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub round: Duration,
    pub warning: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            round: Duration::from_millis(ROUND_MILLIS),
            warning: Duration::from_millis(WARNING_MILLIS),
        }
    }
}

impl From<&Config> for TimerConfig {
    fn from(config: &Config) -> Self {
        Self {
            round: config.round(),
            warning: config.warning(),
        }
    }
}

/// Round deadline tracking.
///
/// The deadline is stored as milliseconds past the timer's creation in an
/// atomic, so readers on other threads never see a torn value. Arithmetic
/// saturates, so an overlong round never wraps into an expired one. Only
/// the dealer resets it.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    epoch: Instant,
    deadline: AtomicU64,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            epoch: Instant::now(),
            deadline: AtomicU64::new(0),
        }
    }
    pub fn with_defaults() -> Self {
        Self::new(TimerConfig::default())
    }
    /// Restarts the countdown at the full round length.
    pub fn reset(&self) {
        let deadline = self.elapsed().saturating_add(millis(self.config.round));
        self.deadline.store(deadline, Ordering::Release);
    }
    /// Instant the round ends, or `None` if it lies beyond what the clock
    /// can represent.
    pub fn deadline(&self) -> Option<Instant> {
        self.epoch
            .checked_add(Duration::from_millis(self.deadline.load(Ordering::Acquire)))
    }
    pub fn expired(&self) -> bool {
        self.elapsed() >= self.deadline.load(Ordering::Acquire)
    }
    pub fn remaining(&self) -> Duration {
        let deadline = self.deadline.load(Ordering::Acquire);
        Duration::from_millis(deadline.saturating_sub(self.elapsed()))
    }
    /// Whether little enough time remains to warn the table.
    pub fn urgent(&self) -> bool {
        self.remaining() <= self.config.warning
    }
    pub fn round(&self) -> Duration {
        self.config.round
    }
    fn elapsed(&self) -> u64 {
        millis(self.epoch.elapsed())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
