use super::{Decision, DecisionContext, OpponentSummary, Policy};
use crate::bot::Difficulty;
use cricket_core::model::player::Seat;
use cricket_core::model::rank::Rank;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{Level, event};

/// How many of its latest asks a policy avoids repeating.
const AVOID_RECENT: usize = 3;

/// Memory-driven request heuristic: chase ranks already paired in hand, avoid
/// repeating recent asks, and ask the larger hands that have not already refused.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicPolicy {
    difficulty: Option<Difficulty>,
}

impl HeuristicPolicy {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty: Some(difficulty),
        }
    }

    /// Never deviates from the heuristic.
    pub fn strict() -> Self {
        Self { difficulty: None }
    }

    fn optimal_play_rate(&self) -> f64 {
        self.difficulty.map_or(1.0, Difficulty::optimal_play_rate)
    }
}

impl Policy for HeuristicPolicy {
    fn decide(&mut self, ctx: &DecisionContext<'_>, rng: &mut dyn RngCore) -> Option<Decision> {
        let targets: Vec<OpponentSummary> = ctx
            .opponents
            .iter()
            .copied()
            .filter(|o| o.seat != ctx.seat && o.hand_size > 0)
            .collect();
        let available = ctx.hand.ranks();
        if available.is_empty() || targets.is_empty() {
            log_no_move(ctx, available.len(), targets.len());
            return None;
        }

        let rate = self.optimal_play_rate();
        if rate < 1.0 && !rng.gen_bool(rate) {
            let rank = *available.choose(rng)?;
            let target = targets.choose(rng)?.seat;
            let decision = Decision { target, rank };
            log_decision(ctx, self.difficulty, decision, "deviate_random");
            return Some(decision);
        }

        let (rank, tier) = choose_rank(ctx, &available, rng)?;
        let (target, pick) = choose_target(ctx, rank, &targets, rng)?;
        let decision = Decision { target, rank };
        log_decision(ctx, self.difficulty, decision, tier);
        event!(
            target: "cricket_bot::decide",
            Level::DEBUG,
            seat = %ctx.seat,
            pick,
            "target chosen"
        );
        Some(decision)
    }
}

fn choose_rank(
    ctx: &DecisionContext<'_>,
    available: &[Rank],
    rng: &mut dyn RngCore,
) -> Option<(Rank, &'static str)> {
    let pairs: Vec<Rank> = available
        .iter()
        .copied()
        .filter(|&rank| ctx.hand.count_rank(rank) >= 2)
        .collect();
    if let Some(&rank) = pairs.choose(rng) {
        return Some((rank, "pairs"));
    }

    let recent: Vec<Rank> = ctx.memory.recent_asks(AVOID_RECENT).collect();
    let fresh: Vec<Rank> = available
        .iter()
        .copied()
        .filter(|rank| !recent.contains(rank))
        .collect();
    if let Some(&rank) = fresh.choose(rng) {
        return Some((rank, "fresh"));
    }

    available.choose(rng).map(|&rank| (rank, "any"))
}

fn choose_target(
    ctx: &DecisionContext<'_>,
    rank: Rank,
    targets: &[OpponentSummary],
    rng: &mut dyn RngCore,
) -> Option<(Seat, &'static str)> {
    let mut promising: Vec<OpponentSummary> = targets
        .iter()
        .copied()
        .filter(|o| !ctx.memory.has_failed(o.seat, rank))
        .collect();

    if promising.is_empty() {
        return targets.choose(rng).map(|o| (o.seat, "any_target"));
    }

    promising.sort_by(|a, b| b.hand_size.cmp(&a.hand_size));
    let upper_half = promising.len().div_ceil(2);
    promising[..upper_half]
        .choose(rng)
        .map(|o| (o.seat, "largest_hands"))
}

fn log_decision(
    ctx: &DecisionContext<'_>,
    difficulty: Option<Difficulty>,
    decision: Decision,
    reason: &str,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    event!(
        target: "cricket_bot::decide",
        Level::INFO,
        seat = %ctx.seat,
        difficulty = difficulty.map_or("strict", Difficulty::as_str),
        hand_size = ctx.hand.len(),
        opponents = ctx.opponents.len(),
        asked = %decision.target,
        rank = %decision.rank,
        reason,
        "decision"
    );
}

fn log_no_move(ctx: &DecisionContext<'_>, ranks: usize, targets: usize) {
    event!(
        target: "cricket_bot::decide",
        Level::DEBUG,
        seat = %ctx.seat,
        ranks,
        targets,
        "no valid move"
    );
}
