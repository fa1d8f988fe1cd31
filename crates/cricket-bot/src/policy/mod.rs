mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::OpponentMemory;
use cricket_core::model::hand::Hand;
use cricket_core::model::player::Seat;
use cricket_core::model::rank::Rank;
use rand::RngCore;

/// Public facts about another seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpponentSummary {
    pub seat: Seat,
    pub hand_size: usize,
}

/// Context provided to policies for decision-making
pub struct DecisionContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub opponents: &'a [OpponentSummary],
    pub memory: &'a OpponentMemory,
}

/// Who to ask, and for what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub target: Seat,
    pub rank: Rank,
}

/// Chooses a card request for a computer-controlled seat.
pub trait Policy: Send {
    /// Returns `None` when there is nothing legal to ask.
    fn decide(&mut self, ctx: &DecisionContext<'_>, rng: &mut dyn RngCore) -> Option<Decision>;
}
