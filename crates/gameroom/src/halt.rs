use parking_lot::Condvar;
use parking_lot::Mutex;
use std::time::Duration;
use std::time::Instant;

/// Cooperative termination flag with interruptible sleeps.
///
/// Setting the flag wakes every thread napping on it; each actor checks
/// the flag before its next unit of work.
#[derive(Debug, Default)]
pub struct Halt {
    halted: Mutex<bool>,
    wake: Condvar,
}

impl Halt {
    pub fn halt(&self) {
        *self.halted.lock() = true;
        self.wake.notify_all();
    }
    pub fn is_halted(&self) -> bool {
        *self.halted.lock()
    }
    /// Sleeps for `duration` unless halted first.
    /// Returns true if the caller should keep running.
    pub fn nap(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut halted = self.halted.lock();
        while !*halted {
            if self.wake.wait_until(&mut halted, deadline).timed_out() {
                break;
            }
        }
        !*halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    #[test]
    fn nap_runs_to_completion() {
        let halt = Halt::default();
        let start = Instant::now();
        assert!(halt.nap(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
    #[test]
    fn halt_interrupts_nap() {
        let halt = Arc::new(Halt::default());
        let sleeper = {
            let halt = halt.clone();
            std::thread::spawn(move || halt.nap(Duration::from_secs(60)))
        };
        std::thread::sleep(Duration::from_millis(20));
        halt.halt();
        assert!(!sleeper.join().expect("sleeper thread"));
        assert!(halt.is_halted());
    }
    #[test]
    fn halted_nap_returns_immediately() {
        let halt = Halt::default();
        halt.halt();
        let start = Instant::now();
        assert!(!halt.nap(Duration::from_secs(60)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
