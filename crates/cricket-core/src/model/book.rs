use crate::model::card::Card;
use crate::model::player::Seat;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};

/// All four cards of one rank, claimed by a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    rank: Rank,
    cards: [Card; 4],
    owner: Seat,
}

impl Book {
    /// Returns `None` unless `cards` are exactly four cards of one rank.
    pub fn try_new(owner: Seat, cards: &[Card]) -> Option<Self> {
        let [a, b, c, d] = <[Card; 4]>::try_from(cards).ok()?;
        let rank = a.rank;
        if [b, c, d].iter().any(|card| card.rank != rank) {
            return None;
        }
        Some(Self {
            rank,
            cards: [a, b, c, d],
            owner,
        })
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn cards(&self) -> &[Card; 4] {
        &self.cards
    }

    pub fn owner(&self) -> Seat {
        self.owner
    }
}
