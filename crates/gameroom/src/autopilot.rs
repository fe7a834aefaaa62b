//! Automated input sources for computer players.
use super::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tri_cards::Oracle;
use tri_core::*;

/// How often a [`Sharp`] player looks for a real triple instead of guessing.
pub const SHARP_ACCURACY: f64 = 0.5;

/// Source of synthetic toggles for a computer player.
///
/// Swappable per seat; the engine's correctness does not depend on what an
/// autopilot picks, only on the toggles going through [`Player::toggle`].
pub trait Autopilot: Send {
    /// Three positions to toggle next, or `None` to sit this turn out.
    fn pick(&mut self, board: &Board) -> Option<[Position; TRIPLE]>;
}

/// Guesses three distinct occupied positions at random.
pub struct Fish(SmallRng);

impl Fish {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl Default for Fish {
    fn default() -> Self {
        Self::new(rand::random())
    }
}

impl Autopilot for Fish {
    fn pick(&mut self, board: &Board) -> Option<[Position; TRIPLE]> {
        let positions = board
            .occupied()
            .into_iter()
            .map(|(position, _)| position)
            .collect::<Vec<_>>();
        positions
            .choose_multiple(&mut self.0, TRIPLE)
            .copied()
            .collect::<Vec<_>>()
            .try_into()
            .ok()
    }
}

/// Asks the oracle for a real triple on the board some of the time,
/// and guesses like a [`Fish`] otherwise.
pub struct Sharp {
    oracle: Arc<dyn Oracle>,
    accuracy: f64,
    fish: Fish,
}

impl Sharp {
    pub fn new(oracle: Arc<dyn Oracle>, accuracy: f64) -> Self {
        Self {
            oracle,
            accuracy: accuracy.clamp(0., 1.),
            fish: Fish::default(),
        }
    }
    fn spot(&self, board: &Board) -> Option<[Position; TRIPLE]> {
        let occupied = board.occupied();
        let cards = occupied.iter().map(|(_, card)| *card).collect::<Vec<_>>();
        let triple = self.oracle.find(&cards, 1).into_iter().next()?;
        let [a, b, c] = triple.map(|card| {
            occupied
                .iter()
                .find(|(_, c)| *c == card)
                .map(|(position, _)| *position)
        });
        Some([a?, b?, c?])
    }
}

impl Autopilot for Sharp {
    fn pick(&mut self, board: &Board) -> Option<[Position; TRIPLE]> {
        match self.fish.0.random_bool(self.accuracy) {
            true => self.spot(board).or_else(|| self.fish.pick(board)),
            false => self.fish.pick(board),
        }
    }
}

/// Input loop run on the computer player's own thread.
///
/// Whenever the player may act: take back leftover tokens, pause, then
/// toggle whatever the autopilot picks. Exits once the player terminates.
pub(crate) fn drive(player: Arc<Player>, mut autopilot: Box<dyn Autopilot>) {
    log::info!("[computer P{}] starting", player.seat());
    while !player.is_terminated() {
        if !player.ready(player.pace()) {
            continue;
        }
        for position in player.tokens() {
            player.toggle(position);
        }
        if !player.nap(player.pace()) {
            break;
        }
        if let Some(triple) = autopilot.pick(player.board()) {
            log::trace!("[computer P{}] trying {:?}", player.seat(), triple);
            for position in triple {
                player.toggle(position);
            }
        }
    }
    log::info!("[computer P{}] terminated", player.seat());
}
