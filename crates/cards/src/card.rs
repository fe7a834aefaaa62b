/// A card identity in `0..deck_size`.
///
/// The card carries no features of its own: reading its id in base
/// `feature_size` yields one digit per feature, least significant first.
/// An 81-card deck with 4 features of 3 values is the classic game.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Card(usize);

impl Card {
    /// Feature values of this card, least significant feature first.
    pub fn features(&self, size: usize, count: usize) -> impl Iterator<Item = usize> {
        let id = self.0;
        (0..count).scan(id, move |rest, _| {
            let digit = *rest % size;
            *rest /= size;
            Some(digit)
        })
    }
}

impl From<usize> for Card {
    fn from(id: usize) -> Self {
        Self(id)
    }
}
impl From<Card> for usize {
    fn from(card: Card) -> Self {
        card.0
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn features_are_base_digits() {
        // 2*1 + 1*3 + 0*9 + 2*27 = 59
        let card = Card::from(59);
        assert_eq!(card.features(3, 4).collect::<Vec<_>>(), vec![2, 1, 0, 2]);
    }
    #[test]
    fn zero_card_is_all_zeros() {
        assert!(Card::from(0).features(3, 4).all(|f| f == 0));
    }
    #[test]
    fn display_pads_id() {
        assert_eq!(Card::from(7).to_string(), "#07");
    }
}
