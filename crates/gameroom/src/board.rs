use parking_lot::Mutex;
use std::collections::HashMap;
use tri_cards::Card;
use tri_core::*;

/// Shared table surface: which card lies at which position.
///
/// Both directions of the mapping live behind one lock so every reader
/// sees them agree. Only the dealer mutates the board; players read it to
/// check that a position holds a card before putting a token on it.
#[derive(Debug)]
pub struct Board {
    size: usize,
    slots: Mutex<Slots>,
}

#[derive(Debug)]
struct Slots {
    cards: Vec<Option<Card>>,
    positions: HashMap<Card, Position>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            slots: Mutex::new(Slots {
                cards: vec![None; size],
                positions: HashMap::with_capacity(size),
            }),
        }
    }
    /// Puts `card` at `position`. Fails if the position is out of range or
    /// occupied, or if the card already lies elsewhere.
    pub fn place(&self, position: Position, card: Card) -> anyhow::Result<()> {
        let mut slots = self.slots.lock();
        anyhow::ensure!(position < self.size, "position {} off the board", position);
        anyhow::ensure!(
            slots.cards[position].is_none(),
            "position {} already holds {}",
            position,
            slots.cards[position].map(|c| c.to_string()).unwrap_or_default()
        );
        anyhow::ensure!(
            !slots.positions.contains_key(&card),
            "{} already on the board",
            card
        );
        slots.cards[position] = Some(card);
        slots.positions.insert(card, position);
        Ok(())
    }
    /// Clears `position`, returning the card that was there.
    pub fn remove(&self, position: Position) -> Option<Card> {
        let mut slots = self.slots.lock();
        let card = slots.cards.get_mut(position)?.take()?;
        slots.positions.remove(&card);
        Some(card)
    }
    /// Card at `position`, if any.
    pub fn card(&self, position: Position) -> Option<Card> {
        self.slots.lock().cards.get(position).copied().flatten()
    }
    /// Position of `card`, if it is on the board.
    pub fn position(&self, card: Card) -> Option<Position> {
        self.slots.lock().positions.get(&card).copied()
    }
    /// Cards at all three positions, read under one lock.
    /// `None` if any position is empty or off the board.
    pub fn cards_at(&self, positions: &[Position; TRIPLE]) -> Option<[Card; TRIPLE]> {
        let slots = self.slots.lock();
        let [a, b, c] = positions.map(|p| slots.cards.get(p).copied().flatten());
        Some([a?, b?, c?])
    }
    /// Unoccupied positions, in ascending order, as of the call.
    pub fn empty(&self) -> impl Iterator<Item = Position> {
        self.slots
            .lock()
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_none())
            .map(|(position, _)| position)
            .collect::<Vec<_>>()
            .into_iter()
    }
    /// Occupied positions with their cards, in ascending order.
    pub fn occupied(&self) -> Vec<(Position, Card)> {
        self.slots
            .lock()
            .cards
            .iter()
            .enumerate()
            .filter_map(|(position, card)| card.map(|c| (position, c)))
            .collect()
    }
    pub fn cards(&self) -> Vec<Card> {
        self.slots.lock().cards.iter().flatten().copied().collect()
    }
    pub fn count(&self) -> usize {
        self.slots.lock().positions.len()
    }
    pub fn size(&self) -> usize {
        self.size
    }
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
    pub fn is_full(&self) -> bool {
        self.count() == self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn place_and_lookup_both_ways() {
        let board = Board::new(4);
        board.place(2, Card::from(9)).unwrap();
        assert_eq!(board.card(2), Some(Card::from(9)));
        assert_eq!(board.position(Card::from(9)), Some(2));
        assert_eq!(board.count(), 1);
    }
    #[test]
    fn place_rejects_occupied_and_duplicates() {
        let board = Board::new(4);
        board.place(0, Card::from(1)).unwrap();
        assert!(board.place(0, Card::from(2)).is_err());
        assert!(board.place(1, Card::from(1)).is_err());
        assert!(board.place(4, Card::from(3)).is_err());
        assert_eq!(board.card(0), Some(Card::from(1)));
    }
    #[test]
    fn remove_clears_both_directions() {
        let board = Board::new(4);
        board.place(3, Card::from(5)).unwrap();
        assert_eq!(board.remove(3), Some(Card::from(5)));
        assert_eq!(board.card(3), None);
        assert_eq!(board.position(Card::from(5)), None);
        assert_eq!(board.remove(3), None);
        assert_eq!(board.remove(99), None);
    }
    #[test]
    fn empty_positions_ascending() {
        let board = Board::new(5);
        board.place(1, Card::from(0)).unwrap();
        board.place(3, Card::from(1)).unwrap();
        assert_eq!(board.empty().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(
            board.occupied(),
            vec![(1, Card::from(0)), (3, Card::from(1))]
        );
    }
    #[test]
    fn cards_at_requires_all_three() {
        let board = Board::new(4);
        board.place(0, Card::from(0)).unwrap();
        board.place(1, Card::from(1)).unwrap();
        assert_eq!(board.cards_at(&[0, 1, 2]), None);
        board.place(2, Card::from(2)).unwrap();
        assert_eq!(
            board.cards_at(&[0, 1, 2]),
            Some([Card::from(0), Card::from(1), Card::from(2)])
        );
        assert_eq!(board.cards_at(&[0, 1, 7]), None);
    }
    #[test]
    fn fills_up() {
        let board = Board::new(2);
        assert!(board.is_empty());
        board.place(0, Card::from(0)).unwrap();
        board.place(1, Card::from(1)).unwrap();
        assert!(board.is_full());
        assert!(board.empty().next().is_none());
    }
}
