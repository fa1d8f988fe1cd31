use crate::model::card::Card;
use crate::model::rank::Rank;
use std::vec::Vec;

/// Cards held by one player, kept sorted by rank then suit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
        self.sort();
    }

    /// Removes and returns every card of `rank`.
    pub fn take_rank(&mut self, rank: Rank) -> Vec<Card> {
        let (taken, kept): (Vec<Card>, Vec<Card>) =
            self.cards.drain(..).partition(|card| card.rank == rank);
        self.cards = kept;
        taken
    }

    pub fn has_rank(&self, rank: Rank) -> bool {
        self.cards.iter().any(|card| card.rank == rank)
    }

    pub fn count_rank(&self, rank: Rank) -> usize {
        self.cards.iter().filter(|card| card.rank == rank).count()
    }

    /// Held ranks without repeats, in rank order.
    pub fn ranks(&self) -> Vec<Rank> {
        let mut ranks: Vec<Rank> = self.cards.iter().map(|card| card.rank).collect();
        ranks.dedup();
        ranks
    }

    pub fn rank_counts(&self) -> [u8; 13] {
        let mut counts = [0u8; 13];
        for card in &self.cards {
            counts[card.rank.index()] += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| a.rank.cmp(&b.rank).then(a.suit.cmp(&b.suit)));
    }
}
