//! Card primitives for the triples game.
//!
//! ## Core Types
//!
//! - [`Card`] — A card identity whose digits encode its features
//! - [`Stock`] — Undealt cards with uniform random draws
//! - [`Oracle`] — Decides whether three cards form a matching triple
//! - [`Triples`] — The standard all-same-or-all-different oracle
mod card;
mod oracle;
mod stock;

pub use card::*;
pub use oracle::*;
pub use stock::*;
