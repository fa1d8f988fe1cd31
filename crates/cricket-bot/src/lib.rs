pub mod bot;
pub mod policy;

pub use bot::{Difficulty, OpponentMemory, OpponentTable};
pub use policy::{Decision, DecisionContext, HeuristicPolicy, OpponentSummary, Policy};
