use super::{Difficulty, OpponentMemory};
use crate::policy::{Decision, DecisionContext, HeuristicPolicy, OpponentSummary, Policy};
use cricket_core::model::hand::Hand;
use cricket_core::model::player::Seat;
use cricket_core::model::rank::Rank;
use rand::RngCore;
use std::collections::BTreeMap;

struct Opponent {
    difficulty: Difficulty,
    memory: OpponentMemory,
    policy: Box<dyn Policy>,
}

/// Per-seat memories and policies for every computer opponent in a session.
#[derive(Default)]
pub struct OpponentTable {
    opponents: BTreeMap<Seat, Opponent>,
}

impl OpponentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `seat` a fresh memory and a heuristic policy at `difficulty`.
    pub fn initialize(&mut self, seat: Seat, difficulty: Difficulty) {
        self.insert_policy(seat, difficulty, Box::new(HeuristicPolicy::new(difficulty)));
    }

    pub fn insert_policy(&mut self, seat: Seat, difficulty: Difficulty, policy: Box<dyn Policy>) {
        self.opponents.insert(
            seat,
            Opponent {
                difficulty,
                memory: OpponentMemory::new(seat),
                policy,
            },
        );
    }

    /// Forgets every opponent.
    pub fn clear(&mut self) {
        self.opponents.clear();
    }

    pub fn difficulty(&self, seat: Seat) -> Option<Difficulty> {
        self.opponents.get(&seat).map(|o| o.difficulty)
    }

    pub fn memory(&self, seat: Seat) -> Option<&OpponentMemory> {
        self.opponents.get(&seat).map(|o| &o.memory)
    }

    /// Asks `seat`'s policy for a request and remembers the chosen rank as asked.
    pub fn decide(
        &mut self,
        seat: Seat,
        hand: &Hand,
        opponents: &[OpponentSummary],
        rng: &mut dyn RngCore,
    ) -> Option<Decision> {
        let Opponent { memory, policy, .. } = self.opponents.get_mut(&seat)?;
        let ctx = DecisionContext {
            seat,
            hand,
            opponents,
            memory,
        };
        let decision = policy.decide(&ctx, rng)?;
        memory.note_own_ask(decision.rank);
        Some(decision)
    }

    /// Shares a resolved request with every opponent.
    pub fn observe_request(&mut self, asker: Seat, target: Seat, rank: Rank) {
        for opponent in self.opponents.values_mut() {
            opponent.memory.note_request(asker, target, rank);
        }
    }

    pub fn observe_book(&mut self, rank: Rank) {
        for opponent in self.opponents.values_mut() {
            opponent.memory.note_book(rank);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_core::model::card::Card;
    use cricket_core::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixed(Decision);

    impl Policy for Fixed {
        fn decide(&mut self, _: &DecisionContext<'_>, _: &mut dyn RngCore) -> Option<Decision> {
            Some(self.0)
        }
    }

    #[test]
    fn decisions_are_remembered_as_own_asks() {
        let mut table = OpponentTable::new();
        let decision = Decision {
            target: Seat::South,
            rank: Rank::Seven,
        };
        table.insert_policy(Seat::North, Difficulty::Hard, Box::new(Fixed(decision)));

        let hand = Hand::with_cards(vec![Card::new(Rank::Seven, Suit::Clubs)]);
        let opponents = [OpponentSummary {
            seat: Seat::South,
            hand_size: 4,
        }];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            table.decide(Seat::North, &hand, &opponents, &mut rng),
            Some(decision)
        );
        let recent: Vec<Rank> = table.memory(Seat::North).unwrap().recent_asks(3).collect();
        assert_eq!(recent, vec![Rank::Seven]);
        assert!(table.decide(Seat::East, &hand, &opponents, &mut rng).is_none());
    }

    #[test]
    fn observations_reach_every_memory() {
        let mut table = OpponentTable::new();
        for seat in [Seat::West, Seat::North, Seat::East] {
            table.initialize(seat, Difficulty::from_name("CPU Bob"));
        }
        assert_eq!(table.difficulty(Seat::North), Some(Difficulty::Medium));

        table.observe_request(Seat::South, Seat::West, Rank::Ace);
        for seat in [Seat::West, Seat::North, Seat::East] {
            let memory = table.memory(seat).unwrap();
            assert!(memory.has_failed(Seat::West, Rank::Ace));
            assert_eq!(memory.belief(Rank::Ace), 1);
        }

        table.observe_book(Rank::Ace);
        assert!(!table.memory(Seat::East).unwrap().has_failed(Seat::West, Rank::Ace));

        table.clear();
        assert!(table.memory(Seat::West).is_none());
    }
}
