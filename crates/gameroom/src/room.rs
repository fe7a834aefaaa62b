use super::*;
use std::sync::Arc;
use std::thread::JoinHandle;
use tri_cards::Oracle;
use tri_cards::Stock;
use tri_core::*;

/// Composition root for one game.
///
/// Builds the shared board, claim queue, players and dealer from a
/// [`Config`], assigns an autopilot to every computer seat, and runs the
/// dealer on its own thread.
pub struct Room {
    dealer: Arc<Dealer>,
    autopilots: Vec<Option<Box<dyn Autopilot>>>,
}

impl Room {
    pub fn new(config: Config, screen: Arc<dyn Screen>, oracle: Arc<dyn Oracle>) -> anyhow::Result<Self> {
        config.validate()?;
        let autopilots = (0..config.players())
            .map(|seat| match config.is_human(seat) {
                true => None,
                false => Some(Box::new(Sharp::new(oracle.clone(), SHARP_ACCURACY)) as Box<dyn Autopilot>),
            })
            .collect();
        let dealer = Arc::new(Dealer::new(config, screen, oracle));
        Ok(Self { dealer, autopilots })
    }
    /// Swaps the autopilot of a computer seat.
    pub fn pilot(&mut self, seat: Seat, autopilot: Box<dyn Autopilot>) -> anyhow::Result<()> {
        match self.autopilots.get_mut(seat) {
            None => Err(anyhow::anyhow!("no seat {}", seat)),
            Some(slot) if slot.is_none() => Err(anyhow::anyhow!("seat {} is human", seat)),
            Some(slot) => {
                *slot = Some(autopilot);
                Ok(())
            }
        }
    }
    /// Replaces the deck the game will be dealt from.
    pub fn restock(&self, stock: Stock) {
        self.dealer.restock(stock);
    }
    pub fn player(&self, seat: Seat) -> Option<Arc<Player>> {
        self.dealer.player(seat).cloned()
    }
    /// Starts the dealer thread.
    pub fn start(self) -> anyhow::Result<Game> {
        let dealer = self.dealer.clone();
        let autopilots = self.autopilots;
        let handle = std::thread::Builder::new()
            .name("dealer".to_string())
            .spawn(move || dealer.run(autopilots))?;
        Ok(Game {
            dealer: self.dealer,
            handle,
        })
    }
    /// Plays the game to completion on a dealer thread and returns the winners.
    pub fn play(self) -> anyhow::Result<Vec<Seat>> {
        self.start()?.wait()
    }
}

/// Handle on a running game.
pub struct Game {
    dealer: Arc<Dealer>,
    handle: JoinHandle<anyhow::Result<Vec<Seat>>>,
}

impl Game {
    /// Ends the game early. Winners are still announced.
    pub fn halt(&self) {
        log::info!("[room] halting");
        self.dealer.terminate();
    }
    pub fn player(&self, seat: Seat) -> Option<Arc<Player>> {
        self.dealer.player(seat).cloned()
    }
    pub fn dealer(&self) -> &Arc<Dealer> {
        &self.dealer
    }
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
    /// Blocks until the dealer has announced the winners and stopped
    /// every player.
    pub fn wait(self) -> anyhow::Result<Vec<Seat>> {
        self.handle
            .join()
            .map_err(|_| anyhow::anyhow!("dealer panicked"))?
    }
}
