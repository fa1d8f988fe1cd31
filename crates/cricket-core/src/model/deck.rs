use crate::error::GameError;
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::seq::SliceRandom;

/// Ordered draw pile. Cards only ever leave it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(crate::DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// Builds a pile from explicit cards, front first.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    /// Fisher-Yates over the whole pile.
    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Splits the first `count` cards off the front; the rest keep their order.
    pub fn deal(&mut self, count: usize) -> Vec<Card> {
        let count = count.min(self.cards.len());
        self.cards.drain(..count).collect()
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        if self.cards.is_empty() {
            return Err(GameError::EmptyDeck);
        }
        Ok(self.cards.remove(0))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::error::GameError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn seeded(seed: u64) -> Deck {
        Deck::shuffled(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), 52);
        let unique: HashSet<_> = deck.cards().iter().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = seeded(42);
        let deck_b = seeded(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = seeded(1);
        let deck_b = seeded(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn deal_takes_front_and_keeps_remainder_order() {
        let mut deck = seeded(7);
        let before = deck.cards().to_vec();
        let dealt = deck.deal(7);
        assert_eq!(dealt, before[..7]);
        assert_eq!(deck.cards(), &before[7..]);
    }

    #[test]
    fn deal_is_clamped_to_remaining_cards() {
        let mut deck = Deck::standard();
        let _ = deck.deal(50);
        assert_eq!(deck.deal(7).len(), 2);
        assert!(deck.is_empty());
    }

    #[test]
    fn draw_takes_front_then_reports_empty() {
        let mut deck = Deck::standard();
        let front = deck.cards()[0];
        assert_eq!(deck.draw(), Ok(front));
        let _ = deck.deal(51);
        assert_eq!(deck.draw(), Err(GameError::EmptyDeck));
    }
}
