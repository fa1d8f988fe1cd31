use cricket_core::model::player::Seat;
use cricket_core::model::rank::Rank;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// How many of its own asks an opponent remembers.
pub const RECENT_ASK_WINDOW: usize = 10;

/// What one computer opponent has learned about the table.
#[derive(Debug, Clone)]
pub struct OpponentMemory {
    seat: Seat,
    known_ranks: BTreeMap<Rank, u32>,
    recent_asks: VecDeque<Rank>,
    failures: BTreeMap<Seat, BTreeSet<Rank>>,
}

impl OpponentMemory {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            known_ranks: BTreeMap::new(),
            recent_asks: VecDeque::with_capacity(RECENT_ASK_WINDOW),
            failures: BTreeMap::new(),
        }
    }

    /// Records a rank this opponent is about to ask for.
    pub fn note_own_ask(&mut self, rank: Rank) {
        if self.recent_asks.len() == RECENT_ASK_WINDOW {
            self.recent_asks.pop_front();
        }
        self.recent_asks.push_back(rank);
    }

    /// Folds in the public result of any request at the table, including our own.
    /// Asking proves the asker holds the rank; afterwards the target holds none of it.
    pub fn note_request(&mut self, asker: Seat, target: Seat, rank: Rank) {
        if asker != self.seat {
            *self.known_ranks.entry(rank).or_insert(0) += 1;
        }

        if let Some(ranks) = self.failures.get_mut(&asker) {
            ranks.remove(&rank);
        }
        self.failures.entry(target).or_default().insert(rank);
    }

    /// A completed book takes the rank out of play for good.
    pub fn note_book(&mut self, rank: Rank) {
        self.known_ranks.remove(&rank);
        for ranks in self.failures.values_mut() {
            ranks.remove(&rank);
        }
    }

    /// The last `count` ranks this opponent asked for, oldest first.
    pub fn recent_asks(&self, count: usize) -> impl Iterator<Item = Rank> + '_ {
        let skip = self.recent_asks.len().saturating_sub(count);
        self.recent_asks.iter().copied().skip(skip)
    }

    pub fn has_failed(&self, target: Seat, rank: Rank) -> bool {
        self.failures
            .get(&target)
            .is_some_and(|ranks| ranks.contains(&rank))
    }

    /// How many times others have been seen asking for `rank`.
    pub fn belief(&self, rank: Rank) -> u32 {
        self.known_ranks.get(&rank).copied().unwrap_or(0)
    }

}
