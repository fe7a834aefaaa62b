use super::card::Card;

/// The undealt cards.
///
/// Draws are uniform over what remains; cards cleared off the board on a
/// reshuffle are restored so they can be dealt again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stock(Vec<Card>);

impl Stock {
    /// A fresh stock holding cards `0..size`.
    pub fn new(size: usize) -> Self {
        Self((0..size).map(Card::from).collect())
    }
    /// Removes and returns a uniformly random card.
    pub fn draw(&mut self) -> Option<Card> {
        match self.0.len() {
            0 => None,
            n => Some(self.0.swap_remove(rand::random_range(0..n))),
        }
    }
    /// Returns a card to the stock.
    pub fn restore(&mut self, card: Card) {
        debug_assert!(!self.0.contains(&card), "{} restored twice", card);
        self.0.push(card);
    }
    /// Cards remaining, in no particular order.
    pub fn cards(&self) -> &[Card] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Card>> for Stock {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}

impl Iterator for Stock {
    type Item = Card;
    fn next(&mut self) -> Option<Self::Item> {
        self.draw()
    }
}
