use parking_lot::Mutex;
use std::time::Duration;
use tri_cards::Card;
use tri_core::*;

/// Display sink the engine paints onto.
///
/// Every call is fire-and-forget: implementations must not block for long
/// and must tolerate being called from any actor thread.
pub trait Screen: Send + Sync {
    fn place_card(&self, card: Card, position: Position);
    fn remove_card(&self, position: Position);
    fn set_countdown(&self, remaining: Duration, urgent: bool);
    fn set_score(&self, seat: Seat, score: usize);
    fn set_freeze(&self, seat: Seat, remaining: Duration);
    fn place_token(&self, seat: Seat, position: Position);
    fn remove_token(&self, seat: Seat, position: Position);
    fn announce(&self, winners: &[Seat]);
}

/// Paints nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Screen for Silent {
    fn place_card(&self, _: Card, _: Position) {}
    fn remove_card(&self, _: Position) {}
    fn set_countdown(&self, _: Duration, _: bool) {}
    fn set_score(&self, _: Seat, _: usize) {}
    fn set_freeze(&self, _: Seat, _: Duration) {}
    fn place_token(&self, _: Seat, _: Position) {}
    fn remove_token(&self, _: Seat, _: Position) {}
    fn announce(&self, _: &[Seat]) {}
}

/// Paints onto the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl Screen for Console {
    fn place_card(&self, card: Card, position: Position) {
        log::info!("[screen] {} dealt to position {}", card, position);
    }
    fn remove_card(&self, position: Position) {
        log::info!("[screen] position {} cleared", position);
    }
    fn set_countdown(&self, remaining: Duration, urgent: bool) {
        match urgent {
            true => log::info!("[screen] {:.1}s left in round", remaining.as_secs_f32()),
            false => log::trace!("[screen] {}s left in round", remaining.as_secs()),
        }
    }
    fn set_score(&self, seat: Seat, score: usize) {
        log::info!("[screen] P{} scores, now at {}", seat, score);
    }
    fn set_freeze(&self, seat: Seat, remaining: Duration) {
        log::trace!("[screen] P{} frozen for {}ms", seat, remaining.as_millis());
    }
    fn place_token(&self, seat: Seat, position: Position) {
        log::trace!("[screen] P{} token on {}", seat, position);
    }
    fn remove_token(&self, seat: Seat, position: Position) {
        log::trace!("[screen] P{} token off {}", seat, position);
    }
    fn announce(&self, winners: &[Seat]) {
        match winners {
            [seat] => log::info!("[screen] P{} wins", seat),
            seats => log::info!("[screen] tie between {:?}", seats),
        }
    }
}

/// One recorded call on a [`Tape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paint {
    PlaceCard(Card, Position),
    RemoveCard(Position),
    Countdown(Duration, bool),
    Score(Seat, usize),
    Freeze(Seat, Duration),
    PlaceToken(Seat, Position),
    RemoveToken(Seat, Position),
    Announce(Vec<Seat>),
}

/// Records every call, for inspecting what the engine showed.
#[derive(Debug, Default)]
pub struct Tape(Mutex<Vec<Paint>>);

impl Tape {
    pub fn paints(&self) -> Vec<Paint> {
        self.0.lock().clone()
    }
    pub fn count<F>(&self, f: F) -> usize
    where
        F: Fn(&Paint) -> bool,
    {
        self.0.lock().iter().filter(|p| f(p)).count()
    }
    pub fn announcements(&self) -> Vec<Vec<Seat>> {
        self.0
            .lock()
            .iter()
            .filter_map(|p| match p {
                Paint::Announce(winners) => Some(winners.clone()),
                _ => None,
            })
            .collect()
    }
    fn push(&self, paint: Paint) {
        self.0.lock().push(paint);
    }
}

impl Screen for Tape {
    fn place_card(&self, card: Card, position: Position) {
        self.push(Paint::PlaceCard(card, position));
    }
    fn remove_card(&self, position: Position) {
        self.push(Paint::RemoveCard(position));
    }
    fn set_countdown(&self, remaining: Duration, urgent: bool) {
        self.push(Paint::Countdown(remaining, urgent));
    }
    fn set_score(&self, seat: Seat, score: usize) {
        self.push(Paint::Score(seat, score));
    }
    fn set_freeze(&self, seat: Seat, remaining: Duration) {
        self.push(Paint::Freeze(seat, remaining));
    }
    fn place_token(&self, seat: Seat, position: Position) {
        self.push(Paint::PlaceToken(seat, position));
    }
    fn remove_token(&self, seat: Seat, position: Position) {
        self.push(Paint::RemoveToken(seat, position));
    }
    fn announce(&self, winners: &[Seat]) {
        self.push(Paint::Announce(winners.to_vec()));
    }
}
