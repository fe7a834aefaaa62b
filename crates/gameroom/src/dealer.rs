use super::*;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use tri_cards::Oracle;
use tri_cards::Stock;
use tri_core::*;

/// Round state machine and sole writer of the board.
///
/// Each round: deal, count down while resolving claims in submission
/// order, then reshuffle. Rounds repeat until no matching triple is left
/// among the cards still in play or the game is terminated, after which
/// the winners are announced and every player actor is stopped.
pub struct Dealer {
    config: Config,
    board: Arc<Board>,
    queue: Arc<Queue<Claim>>,
    screen: Arc<dyn Screen>,
    oracle: Arc<dyn Oracle>,
    players: Vec<Arc<Player>>,
    stock: Mutex<Stock>,
    timer: Timer,
    halt: Halt,
    actors: Mutex<Vec<JoinHandle<()>>>,
}

impl Dealer {
    pub fn new(config: Config, screen: Arc<dyn Screen>, oracle: Arc<dyn Oracle>) -> Self {
        let board = Arc::new(Board::new(config.table_size));
        let queue = Arc::new(Queue::new(config.players()));
        let players = (0..config.players())
            .map(|seat| Player::new(seat, &config, board.clone(), queue.clone(), screen.clone()))
            .map(Arc::new)
            .collect();
        Self {
            stock: Mutex::new(Stock::new(config.deck_size)),
            timer: Timer::new(TimerConfig::from(&config)),
            halt: Halt::default(),
            actors: Mutex::new(Vec::new()),
            config,
            board,
            queue,
            screen,
            oracle,
            players,
        }
    }
    /// Replaces the undealt cards.
    pub fn restock(&self, stock: Stock) {
        *self.stock.lock() = stock;
    }
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }
    pub fn player(&self, seat: Seat) -> Option<&Arc<Player>> {
        self.players.get(seat)
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn queue(&self) -> &Queue<Claim> {
        &self.queue
    }
    pub fn timer(&self) -> &Timer {
        &self.timer
    }
    pub fn stock(&self) -> Stock {
        self.stock.lock().clone()
    }
    pub fn is_terminated(&self) -> bool {
        self.halt.is_halted()
    }
}

// game lifecycle
impl Dealer {
    /// Runs the game to completion on the calling thread.
    ///
    /// Spawns one actor per player, driving computer seats with the
    /// matching autopilot, and returns the winners.
    pub fn run(&self, autopilots: Vec<Option<Box<dyn Autopilot>>>) -> anyhow::Result<Vec<Seat>> {
        log::info!("[dealer] starting with {} players", self.players.len());
        if let Err(e) = self.seat(autopilots) {
            self.terminate();
            return Err(e);
        }
        self.reset_round_deadline();
        loop {
            self.deal();
            let finished = self.should_finish() || {
                self.countdown();
                self.should_finish()
            };
            if finished {
                self.clear_table();
                break;
            }
            self.reshuffle();
        }
        let winners = self.announce();
        self.terminate();
        log::info!("[dealer] terminated");
        Ok(winners)
    }
    /// True once terminated or when no matching triple is left among the
    /// stock and the board combined, that is among every card still in play.
    pub fn should_finish(&self) -> bool {
        self.is_terminated() || {
            let mut cards = self.stock.lock().cards().to_vec();
            cards.extend(self.board.cards());
            !self.oracle.exists(&cards)
        }
    }
    /// Stops every player actor, highest seat first, then wakes the dealer.
    /// Safe to call more than once and from any thread.
    pub fn terminate(&self) {
        self.players.iter().rev().for_each(|p| p.terminate());
        self.halt.halt();
        self.queue.close();
        let actors = std::mem::take(&mut *self.actors.lock());
        for handle in actors.into_iter().rev() {
            let name = handle.thread().name().unwrap_or_default().to_string();
            if handle.join().is_err() {
                log::error!("[dealer] {} panicked", name);
            }
        }
    }
    /// Every seat holding the top score.
    pub fn winners(&self) -> Vec<Seat> {
        let best = self.players.iter().map(|p| p.score()).max().unwrap_or(0);
        self.players
            .iter()
            .filter(|p| p.score() == best)
            .map(|p| p.seat())
            .collect()
    }
    fn announce(&self) -> Vec<Seat> {
        let winners = self.winners();
        log::info!("[dealer] winners {:?}", winners);
        self.screen.announce(&winners);
        winners
    }
    fn seat(&self, autopilots: Vec<Option<Box<dyn Autopilot>>>) -> anyhow::Result<()> {
        let mut actors = self.actors.lock();
        let autopilots = autopilots.into_iter().chain(std::iter::repeat_with(|| None));
        for (player, autopilot) in self.players.iter().zip(autopilots) {
            let autopilot = autopilot.filter(|_| !player.is_human());
            actors.push(player.spawn(autopilot)?);
        }
        Ok(())
    }
}

// round phases
impl Dealer {
    /// Fills every empty position from the stock.
    ///
    /// Dealing onto a bare board disables the players for the duration so
    /// nobody tokens a card mid-deal.
    pub fn deal(&self) {
        let bare = self.board.is_empty();
        if bare {
            self.disable_all();
        }
        for position in self.board.empty() {
            let Some(card) = self.stock.lock().draw() else {
                break;
            };
            match self.board.place(position, card) {
                Ok(()) => self.screen.place_card(card, position),
                Err(e) => {
                    log::error!("[dealer] {}", e);
                    self.stock.lock().restore(card);
                    continue;
                }
            }
            if !self.halt.nap(self.config.deal()) {
                break;
            }
        }
        if bare {
            self.enable_all();
        }
        if self.config.hints {
            self.hint();
        }
    }
    /// Counts the round down, resolving one claim per wake-up, until the
    /// round deadline passes or the game should finish.
    pub fn countdown(&self) {
        while !self.timer.expired() && !self.should_finish() {
            let claim = self.queue.take_timeout(self.config.tick());
            self.refresh_countdown();
            if let Some(claim) = claim {
                if self.resolve(claim) == Verdict::Match {
                    self.deal();
                }
            }
        }
    }
    /// Rules on one claim under the claimant's lock.
    pub fn resolve(&self, claim: Claim) -> Verdict {
        let Some(player) = self.players.get(claim.seat) else {
            log::warn!("[dealer] claim from unknown seat {}", claim.seat);
            return Verdict::Stale;
        };
        let verdict = player.settle(&claim, || match self.board.cards_at(&claim.positions) {
            None => Verdict::Stale,
            Some(cards) if self.oracle.test(&cards) => {
                self.collect(&claim);
                Verdict::Match
            }
            Some(_) => Verdict::Mismatch,
        });
        log::debug!("[dealer] {}: {}", claim, verdict);
        if verdict == Verdict::Match {
            self.reset_round_deadline();
        }
        verdict
    }
    /// Clears the table and opens the next round with a full countdown.
    pub fn reshuffle(&self) {
        log::debug!("[dealer] reshuffling");
        self.clear_table();
        self.enable_all();
        self.reset_round_deadline();
    }
    /// Clears the board back into the stock and wipes every token.
    /// Claims still pending are dropped and their players released.
    /// Players stay disabled afterwards.
    pub fn clear_table(&self) {
        self.disable_all();
        for (position, card) in self.board.occupied() {
            if self.board.remove(position).is_some() {
                self.screen.remove_card(position);
                self.stock.lock().restore(card);
            }
            self.halt.nap(self.config.deal());
        }
        self.players.iter().for_each(|p| p.clear());
        for claim in self.queue.drain() {
            log::debug!("[dealer] dropping pending {}", claim);
            if let Some(player) = self.players.get(claim.seat) {
                player.release();
            }
        }
    }
    /// Gives the whole table a fresh countdown.
    pub fn reset_round_deadline(&self) {
        self.timer.reset();
        self.screen.set_countdown(self.timer.round(), false);
    }
}

impl Dealer {
    /// Takes a matched triple off the board and every other player's
    /// tokens off those positions. The claimant's lock is already held.
    fn collect(&self, claim: &Claim) {
        for &position in &claim.positions {
            if self.board.remove(position).is_some() {
                self.screen.remove_card(position);
            }
        }
        self.players
            .iter()
            .filter(|p| p.seat() != claim.seat)
            .for_each(|p| p.discard(&claim.positions));
    }
    fn refresh_countdown(&self) {
        self.screen
            .set_countdown(self.timer.remaining(), self.timer.urgent());
    }
    fn disable_all(&self) {
        self.players.iter().for_each(|p| p.disable());
    }
    fn enable_all(&self) {
        self.players.iter().for_each(|p| p.enable());
    }
    fn hint(&self) {
        let occupied = self.board.occupied();
        let cards = occupied.iter().map(|(_, card)| *card).collect::<Vec<_>>();
        for triple in self.oracle.find(&cards, usize::MAX) {
            let positions = triple.map(|card| self.board.position(card));
            log::info!(
                "[dealer] hint: {} {} {} at {:?}",
                triple[0],
                triple[1],
                triple[2],
                positions
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tri_cards::Card;
    use tri_cards::Triples;

    /// Cards whose every feature is 0 or 1 never form a triple.
    fn binary_cards() -> Vec<Card> {
        (0..DECK_SIZE)
            .map(Card::from)
            .filter(|c| c.features(FEATURE_SIZE, FEATURE_COUNT).all(|f| f < 2))
            .collect()
    }
    fn config() -> Config {
        Config {
            humans: 2,
            computers: 0,
            deal_ms: 0,
            tick_ms: 5,
            ..Config::default()
        }
    }
    fn dealer(stock: Vec<Card>) -> (Dealer, Arc<Tape>) {
        dealer_with(config(), stock)
    }
    fn dealer_with(config: Config, stock: Vec<Card>) -> (Dealer, Arc<Tape>) {
        let tape = Arc::new(Tape::default());
        let dealer = Dealer::new(config, tape.clone(), Arc::new(Triples::default()));
        dealer.restock(Stock::from(stock));
        (dealer, tape)
    }
    fn claim(dealer: &Dealer, seat: Seat, cards: [usize; 3]) -> Claim {
        let player = dealer.player(seat).unwrap();
        for card in cards {
            let position = dealer.board().position(Card::from(card)).expect("dealt");
            player.toggle(position);
        }
        assert_eq!(dealer.queue().len(), 1);
        dealer.queue().take().unwrap()
    }

    #[test]
    fn deal_fills_board_and_enables() {
        let (dealer, tape) = dealer((0..DECK_SIZE).map(Card::from).collect());
        assert!(dealer.players().iter().all(|p| p.phase() == Phase::Disabled));
        dealer.deal();
        assert!(dealer.board().is_full());
        assert_eq!(dealer.stock().len(), DECK_SIZE - TABLE_SIZE);
        assert!(dealer.players().iter().all(|p| p.phase() == Phase::Idle));
        assert_eq!(tape.count(|p| matches!(p, Paint::PlaceCard(..))), TABLE_SIZE);
    }
    #[test]
    fn deal_stops_when_stock_runs_out() {
        let (dealer, _) = dealer((0..5).map(Card::from).collect());
        dealer.deal();
        assert_eq!(dealer.board().count(), 5);
        assert!(dealer.stock().is_empty());
    }
    #[test]
    fn valid_claim_scores_and_clears_positions() {
        let (dealer, tape) = dealer((0..TABLE_SIZE).map(Card::from).collect());
        dealer.deal();
        let other = dealer.player(1).unwrap();
        let shared = dealer.board().position(Card::from(1)).unwrap();
        other.toggle(shared);
        let claim = claim(&dealer, 0, [0, 1, 2]);
        assert_eq!(dealer.resolve(claim), Verdict::Match);
        assert!(dealer.queue().is_empty());
        assert_eq!(dealer.player(0).unwrap().score(), 1);
        assert_eq!(dealer.player(1).unwrap().score(), 0);
        for position in claim.positions {
            assert_eq!(dealer.board().card(position), None);
            assert!(dealer.players().iter().all(|p| !p.tokens().contains(&position)));
        }
        assert_eq!(dealer.board().count(), TABLE_SIZE - 3);
        assert_eq!(dealer.player(0).unwrap().phase(), Phase::Frozen);
        assert!(tape.paints().contains(&Paint::Score(0, 1)));
    }
    #[test]
    fn invalid_claim_penalizes_only_claimant() {
        let (dealer, _) = dealer((0..TABLE_SIZE).map(Card::from).collect());
        dealer.deal();
        let before = dealer.board().occupied();
        // 0 = 0000, 1 = 1000, 4 = 1100: first feature has two alike
        let claim = claim(&dealer, 1, [0, 1, 4]);
        assert_eq!(dealer.resolve(claim), Verdict::Mismatch);
        assert!(dealer.queue().is_empty());
        assert_eq!(dealer.player(1).unwrap().score(), 0);
        assert_eq!(dealer.board().occupied(), before);
        assert_eq!(dealer.player(1).unwrap().phase(), Phase::Frozen);
        assert!(dealer.player(1).unwrap().frozen_for() > Duration::from_millis(2_500));
        assert_eq!(dealer.player(0).unwrap().phase(), Phase::Idle);
    }
    #[test]
    fn stale_claim_dropped_without_penalty() {
        let (dealer, _) = dealer((0..TABLE_SIZE).map(Card::from).collect());
        dealer.deal();
        let claim = claim(&dealer, 0, [0, 1, 2]);
        dealer.player(0).unwrap().discard(&[claim.positions[0]]);
        assert_eq!(dealer.resolve(claim), Verdict::Stale);
        assert_eq!(dealer.player(0).unwrap().phase(), Phase::Idle);
        assert_eq!(dealer.board().count(), TABLE_SIZE);
    }
    #[test]
    fn match_resets_round_deadline() {
        let (dealer, _) = dealer((0..TABLE_SIZE).map(Card::from).collect());
        dealer.deal();
        assert!(dealer.timer().expired());
        let claim = claim(&dealer, 0, [0, 1, 2]);
        dealer.resolve(claim);
        assert!(dealer.timer().remaining() > Duration::from_secs(59));
    }
    #[test]
    fn reshuffle_returns_cards_and_wipes_tokens() {
        let (dealer, _) = dealer((0..DECK_SIZE).map(Card::from).collect());
        dealer.deal();
        dealer.player(0).unwrap().toggle(0);
        let claim = claim(&dealer, 1, [0, 1, 2]);
        dealer.queue().submit(claim).unwrap();
        dealer.reshuffle();
        assert!(dealer.board().is_empty());
        assert_eq!(dealer.stock().len(), DECK_SIZE);
        assert!(dealer.queue().is_empty());
        assert!(dealer.players().iter().all(|p| p.tokens().is_empty()));
        assert!(dealer.players().iter().all(|p| p.phase() == Phase::Idle));
        assert!(dealer.timer().remaining() > Duration::from_secs(59));
    }
    #[test]
    fn finishes_without_any_triple() {
        let (dealer, _) = dealer(binary_cards());
        dealer.deal();
        assert!(dealer.should_finish());
    }
    #[test]
    fn board_cards_still_count_once_stock_is_empty() {
        let (dealer, _) = dealer((0..TABLE_SIZE).map(Card::from).collect());
        dealer.deal();
        assert!(dealer.stock().is_empty());
        assert!(!dealer.should_finish());
    }
    #[test]
    fn continues_while_triple_remains() {
        let (dealer, _) = dealer((0..DECK_SIZE).map(Card::from).collect());
        assert!(!dealer.should_finish());
        dealer.terminate();
        assert!(dealer.should_finish());
    }
    #[test]
    fn winners_include_every_tie() {
        let (dealer, _) = dealer((0..TABLE_SIZE).map(Card::from).collect());
        assert_eq!(dealer.winners(), vec![0, 1]);
        dealer.deal();
        let claim = claim(&dealer, 1, [0, 1, 2]);
        dealer.resolve(claim);
        assert_eq!(dealer.winners(), vec![1]);
    }
    #[test]
    fn run_without_triples_ends_at_once() {
        let (dealer, tape) = dealer(binary_cards());
        let winners = dealer.run(Vec::new()).unwrap();
        assert_eq!(winners, vec![0, 1]);
        assert_eq!(tape.announcements(), vec![vec![0, 1]]);
        assert!(dealer.board().is_empty());
        assert!(dealer.queue().is_closed());
        assert!(dealer.players().iter().all(|p| p.is_terminated()));
        assert!(dealer.players().iter().all(|p| p.phase() == Phase::Disabled));
        assert_eq!(tape.count(|p| matches!(p, Paint::Countdown(..))), 1);
    }
    #[test]
    fn clear_table_leaves_players_disabled() {
        let (dealer, _) = dealer((0..DECK_SIZE).map(Card::from).collect());
        dealer.deal();
        dealer.reset_round_deadline();
        let before = dealer.timer().remaining();
        dealer.clear_table();
        assert!(dealer.board().is_empty());
        assert!(dealer.players().iter().all(|p| p.phase() == Phase::Disabled));
        assert!(dealer.timer().remaining() <= before);
    }
    #[test]
    fn countdown_resolves_in_submission_order() {
        let config = Config {
            round_ms: 50,
            ..config()
        };
        let (dealer, tape) = dealer_with(config, (0..TABLE_SIZE).map(Card::from).collect());
        dealer.deal();
        // 3-4-5 and 0-1-2 differ only in their first feature
        for (seat, cards) in [(1, [3, 4, 5]), (0, [0, 1, 2])] {
            let player = dealer.player(seat).unwrap();
            for card in cards {
                player.toggle(dealer.board().position(Card::from(card)).unwrap());
            }
        }
        assert_eq!(dealer.queue().len(), 2);
        dealer.reset_round_deadline();
        dealer.countdown();
        assert!(dealer.queue().is_empty());
        let rulings = tape
            .paints()
            .into_iter()
            .filter(|p| matches!(p, Paint::Score(..) | Paint::Freeze(..)))
            .collect::<Vec<_>>();
        let reward = Duration::from_millis(REWARD_MILLIS);
        assert_eq!(
            rulings,
            vec![
                Paint::Score(1, 1),
                Paint::Freeze(1, reward),
                Paint::Score(0, 1),
                Paint::Freeze(0, reward),
            ]
        );
        assert_eq!(dealer.board().count(), TABLE_SIZE - 6);
    }
}
