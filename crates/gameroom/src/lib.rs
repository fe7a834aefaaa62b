//! Thread-per-actor runtime for live triples games.
//!
//! One dealer thread owns the board and rules on claims in the order they
//! were made. Every player runs a freeze thread of its own, and computer
//! players additionally run an input thread driven by an [`Autopilot`].
//!
//! ## Architecture
//!
//! - [`Room`] — Composition root that wires a game together and starts it
//! - [`Dealer`] — Round state machine and sole writer of the board
//! - [`Player`] — Token set, score and freeze state for one seat
//! - [`Queue`] — Bounded FIFO carrying claims from players to the dealer
//! - [`Board`] — Fixed grid of positions holding face-up cards
//! - [`Timer`] — Round deadline shared by the whole table
//!
//! ## Output
//!
//! - [`Screen`] — Sink for everything a display would render
//! - [`Console`], [`Silent`], [`Tape`] — Logging, no-op and recording sinks
mod autopilot;
mod board;
mod claim;
mod dealer;
mod halt;
mod player;
mod queue;
mod room;
mod screen;
mod timer;

pub use autopilot::*;
pub use board::*;
pub use claim::*;
pub use dealer::*;
pub use halt::*;
pub use player::*;
pub use queue::*;
pub use room::*;
pub use screen::*;
pub use timer::*;
