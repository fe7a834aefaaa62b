use super::*;
use crate::autopilot::drive;
use parking_lot::Condvar;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;
use tri_core::*;

/// Observable player state.
///
/// `Disabled` pre-empts everything else: while the dealer rebuilds the
/// board no toggle is accepted, whatever the freeze state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disabled,
    Idle,
    Awaiting,
    Frozen,
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Ignored,
    Placed,
    Removed,
    Claimed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Idle,
    Awaiting,
    Frozen(Instant),
}

#[derive(Debug)]
struct Hand {
    tokens: Vec<Position>,
    status: Status,
}

/// One seat at the table.
///
/// The token set and freeze status sit behind a per-player lock that both
/// the player's toggles and the dealer's resolution of this player's claim
/// take, so neither ever sees the other half-done.
///
/// - `stirred` wakes the freeze loop when a freeze is imposed
/// - `settled` wakes input sources when the player may act again
pub struct Player {
    seat: Seat,
    human: bool,
    tick: Duration,
    pace: Duration,
    reward: Duration,
    penalty: Duration,
    board: Arc<Board>,
    queue: Arc<Queue<Claim>>,
    screen: Arc<dyn Screen>,
    hand: Mutex<Hand>,
    stirred: Condvar,
    settled: Condvar,
    enabled: AtomicBool,
    score: AtomicUsize,
    halt: Halt,
}

impl Player {
    pub fn new(
        seat: Seat,
        config: &Config,
        board: Arc<Board>,
        queue: Arc<Queue<Claim>>,
        screen: Arc<dyn Screen>,
    ) -> Self {
        Self {
            seat,
            human: config.is_human(seat),
            tick: config.tick(),
            pace: config.pace(),
            reward: config.reward(),
            penalty: config.penalty(),
            board,
            queue,
            screen,
            hand: Mutex::new(Hand {
                tokens: Vec::with_capacity(TRIPLE),
                status: Status::Idle,
            }),
            stirred: Condvar::new(),
            settled: Condvar::new(),
            enabled: AtomicBool::new(false),
            score: AtomicUsize::new(0),
            halt: Halt::default(),
        }
    }
    pub fn seat(&self) -> Seat {
        self.seat
    }
    pub fn is_human(&self) -> bool {
        self.human
    }
    pub fn score(&self) -> usize {
        self.score.load(Ordering::Acquire)
    }
    pub fn tokens(&self) -> Vec<Position> {
        self.hand.lock().tokens.clone()
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn pace(&self) -> Duration {
        self.pace
    }
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
    pub fn is_terminated(&self) -> bool {
        self.halt.is_halted()
    }
    pub fn phase(&self) -> Phase {
        let hand = self.hand.lock();
        match (self.is_enabled(), hand.status) {
            (false, _) => Phase::Disabled,
            (true, Status::Idle) => Phase::Idle,
            (true, Status::Awaiting) => Phase::Awaiting,
            (true, Status::Frozen(_)) => Phase::Frozen,
        }
    }
    /// Remaining freeze, zero when not frozen.
    pub fn frozen_for(&self) -> Duration {
        match self.hand.lock().status {
            Status::Frozen(until) => until.saturating_duration_since(Instant::now()),
            _ => Duration::ZERO,
        }
    }
}

// input side
impl Player {
    /// Puts a token on `position`, or takes it back if already there.
    ///
    /// Placing the third token submits a claim for exactly those three
    /// positions and locks the player until the dealer rules on it.
    pub fn toggle(&self, position: Position) -> Toggle {
        if position >= self.board.size() {
            return Toggle::Ignored;
        }
        let mut hand = self.hand.lock();
        if !self.is_enabled() || hand.status != Status::Idle {
            return Toggle::Ignored;
        }
        if let Some(i) = hand.tokens.iter().position(|p| *p == position) {
            hand.tokens.remove(i);
            self.screen.remove_token(self.seat, position);
            log::trace!("[player P{}] token off {}", self.seat, position);
            return Toggle::Removed;
        }
        if hand.tokens.len() >= TRIPLE || self.board.card(position).is_none() {
            return Toggle::Ignored;
        }
        hand.tokens.push(position);
        self.screen.place_token(self.seat, position);
        log::trace!("[player P{}] token on {}", self.seat, position);
        if hand.tokens.len() < TRIPLE {
            return Toggle::Placed;
        }
        let claim = Claim::new(self.seat, [hand.tokens[0], hand.tokens[1], hand.tokens[2]]);
        if self.queue.len() >= self.queue.capacity() {
            log::error!("[player P{}] claim queue full, protocol broken", self.seat);
            debug_assert!(false, "more pending claims than players");
        }
        hand.status = Status::Awaiting;
        match self.queue.submit(claim) {
            Ok(()) => {
                log::debug!("[player P{}] submitted {}", self.seat, claim);
                Toggle::Claimed
            }
            Err(_) => {
                hand.status = Status::Idle;
                Toggle::Placed
            }
        }
    }
    /// Waits up to `timeout` for the player to be able to act.
    pub fn ready(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut hand = self.hand.lock();
        loop {
            if self.is_terminated() {
                return false;
            }
            if hand.status == Status::Idle && self.is_enabled() {
                return true;
            }
            if self.settled.wait_until(&mut hand, deadline).timed_out() {
                return hand.status == Status::Idle && self.is_enabled() && !self.is_terminated();
            }
        }
    }
    /// Sleeps for `duration` unless terminated first.
    pub fn nap(&self, duration: Duration) -> bool {
        self.halt.nap(duration)
    }
}

// dealer side
impl Player {
    /// Rules on this player's claim while holding the player's lock.
    ///
    /// The claim is stale unless the player is still awaiting it with the
    /// very same tokens; stale claims release the player without a freeze.
    /// Otherwise `judge` decides, and a match clears the claimant's tokens,
    /// scores a point and imposes the reward freeze; a mismatch imposes
    /// the penalty freeze.
    pub fn settle<F>(&self, claim: &Claim, judge: F) -> Verdict
    where
        F: FnOnce() -> Verdict,
    {
        let mut hand = self.hand.lock();
        let verdict = match hand.status == Status::Awaiting && hand.tokens == claim.positions {
            true => judge(),
            false => Verdict::Stale,
        };
        match verdict {
            Verdict::Match => {
                hand.tokens
                    .drain(..)
                    .for_each(|p| self.screen.remove_token(self.seat, p));
                let score = self.score.fetch_add(1, Ordering::AcqRel) + 1;
                self.screen.set_score(self.seat, score);
                self.freeze(&mut hand, self.reward);
            }
            Verdict::Mismatch => self.freeze(&mut hand, self.penalty),
            Verdict::Stale => self.unblock(&mut hand),
        }
        verdict
    }
    /// Removes any of this player's tokens lying on `positions`.
    pub fn discard(&self, positions: &[Position]) {
        let mut hand = self.hand.lock();
        let removed = hand
            .tokens
            .iter()
            .filter(|p| positions.contains(p))
            .copied()
            .collect::<Vec<_>>();
        hand.tokens.retain(|p| !positions.contains(p));
        removed
            .into_iter()
            .for_each(|p| self.screen.remove_token(self.seat, p));
    }
    /// Removes every token.
    pub fn clear(&self) {
        let mut hand = self.hand.lock();
        hand.tokens
            .drain(..)
            .for_each(|p| self.screen.remove_token(self.seat, p));
    }
    /// Lets a player whose claim was dropped act again.
    pub fn release(&self) {
        let mut hand = self.hand.lock();
        self.unblock(&mut hand);
    }
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
        let _hand = self.hand.lock();
        self.settled.notify_all();
    }
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }
    /// Stops the actor and its input source at their next check.
    pub fn terminate(&self) {
        self.halt.halt();
        let _hand = self.hand.lock();
        self.stirred.notify_all();
        self.settled.notify_all();
    }
    fn freeze(&self, hand: &mut Hand, duration: Duration) {
        if duration.is_zero() {
            hand.status = Status::Idle;
            self.settled.notify_all();
        } else {
            hand.status = Status::Frozen(Instant::now() + duration);
            self.screen.set_freeze(self.seat, duration);
            self.stirred.notify_all();
        }
    }
    fn unblock(&self, hand: &mut Hand) {
        if hand.status == Status::Awaiting {
            hand.status = Status::Idle;
            self.settled.notify_all();
        }
    }
}

// actor thread
impl Player {
    /// Starts the actor thread, and the autopilot thread it owns if any.
    pub fn spawn(self: &Arc<Self>, autopilot: Option<Box<dyn Autopilot>>) -> anyhow::Result<JoinHandle<()>> {
        let player = self.clone();
        Ok(std::thread::Builder::new()
            .name(format!("player-{}", self.seat))
            .spawn(move || player.run(autopilot))?)
    }
    fn run(self: Arc<Self>, autopilot: Option<Box<dyn Autopilot>>) {
        log::info!("[player P{}] starting", self.seat);
        let pilot = autopilot.and_then(|autopilot| {
            let player = self.clone();
            std::thread::Builder::new()
                .name(format!("computer-{}", self.seat))
                .spawn(move || drive(player, autopilot))
                .inspect_err(|e| log::error!("[player P{}] autopilot failed: {}", self.seat, e))
                .ok()
        });
        self.watch();
        if let Some(handle) = pilot {
            if handle.join().is_err() {
                log::error!("[player P{}] autopilot panicked", self.seat);
            }
        }
        log::info!("[player P{}] terminated", self.seat);
    }
    /// Freeze loop: refreshes the remaining freeze every tick, thaws the
    /// player at the deadline, and otherwise sleeps until stirred.
    fn watch(&self) {
        let mut hand = self.hand.lock();
        while !self.is_terminated() {
            match hand.status {
                Status::Frozen(until) if Instant::now() < until => {
                    let now = Instant::now();
                    self.screen.set_freeze(self.seat, until - now);
                    self.stirred.wait_until(&mut hand, until.min(now + self.tick));
                }
                Status::Frozen(_) => {
                    hand.status = Status::Idle;
                    self.screen.set_freeze(self.seat, Duration::ZERO);
                    self.settled.notify_all();
                    log::debug!("[player P{}] thawed", self.seat);
                }
                Status::Idle | Status::Awaiting => self.stirred.wait(&mut hand),
            }
        }
    }
}
