//! Real-time matching-card game engine.
//!
//! This facade crate re-exports every triples crate for convenient access.
//!
//! ## Crate Organization
//!
//! - [`core`] — Type aliases, constants, configuration and logging
//! - [`cards`] — Cards, the undealt stock, and the matching oracle
//! - [`gameroom`] — Dealer, players, claim queue and board runtime

pub use tri_cards    as cards;
pub use tri_core     as core;
pub use tri_gameroom as gameroom;
