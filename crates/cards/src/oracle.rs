use super::card::Card;
use tri_core::*;

/// Decides which card triples match.
///
/// Shared between the dealer, which validates claims and decides when the
/// game is over, and autopilots, which look for something worth claiming.
pub trait Oracle: Send + Sync {
    /// Whether exactly these three cards form a matching triple.
    fn test(&self, cards: &[Card; TRIPLE]) -> bool;
    /// Up to `limit` matching triples among `cards`, in input order.
    fn find(&self, cards: &[Card], limit: usize) -> Vec<[Card; TRIPLE]> {
        let mut found = Vec::new();
        let n = cards.len();
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    if found.len() >= limit {
                        return found;
                    }
                    let triple = [cards[i], cards[j], cards[k]];
                    if self.test(&triple) {
                        found.push(triple);
                    }
                }
            }
        }
        found
    }
    /// Whether any matching triple exists among `cards`.
    fn exists(&self, cards: &[Card]) -> bool {
        !self.find(cards, 1).is_empty()
    }
}

/// The classic rule: on every feature, the three cards are either all
/// equal or all different.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triples {
    size: usize,
    count: usize,
}

impl Triples {
    pub fn new(size: usize, count: usize) -> Self {
        Self { size, count }
    }
}

impl Default for Triples {
    fn default() -> Self {
        Self::new(FEATURE_SIZE, FEATURE_COUNT)
    }
}

impl From<&Config> for Triples {
    fn from(config: &Config) -> Self {
        Self::new(config.feature_size, config.feature_count)
    }
}

impl Oracle for Triples {
    fn test(&self, cards: &[Card; TRIPLE]) -> bool {
        let [a, b, c] = cards;
        if a == b || b == c || a == c {
            return false;
        }
        a.features(self.size, self.count)
            .zip(b.features(self.size, self.count))
            .zip(c.features(self.size, self.count))
            .all(|((x, y), z)| (x == y && y == z) || (x != y && y != z && x != z))
    }
}
