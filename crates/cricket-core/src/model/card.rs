use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Stable identity derived from suit and rank, e.g. `hearts-A`.
    pub fn id(self) -> String {
        format!("{}-{}", self.suit.name(), self.rank)
    }

    /// Dense index in `0..52`, suit-major.
    pub const fn ordinal(self) -> usize {
        self.suit.index() * 13 + self.rank.index()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}
