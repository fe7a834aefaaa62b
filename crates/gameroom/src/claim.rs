use tri_core::*;

/// A player's assertion that three positions hold a matching triple.
/// Snapshot of the token set at the moment the third token went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Claim {
    pub seat: Seat,
    pub positions: [Position; TRIPLE],
}

impl Claim {
    pub fn new(seat: Seat, positions: [Position; TRIPLE]) -> Self {
        Self { seat, positions }
    }
}

impl std::fmt::Display for Claim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.positions;
        write!(f, "P{} claims {}-{}-{}", self.seat, a, b, c)
    }
}

/// Outcome of resolving one claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Cards matched: point awarded, cards taken off the board.
    Match,
    /// Cards did not match: claimant penalized, board untouched.
    Mismatch,
    /// Tokens changed since the claim was made: dropped silently.
    Stale,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Match => write!(f, "match"),
            Verdict::Mismatch => write!(f, "mismatch"),
            Verdict::Stale => write!(f, "stale"),
        }
    }
}
