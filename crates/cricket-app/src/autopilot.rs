use cricket_bot::{Decision, DecisionContext, HeuristicPolicy, OpponentMemory, OpponentSummary, Policy};
use cricket_core::game::GameView;
use cricket_core::model::hand::Hand;
use cricket_core::model::player::Seat;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

/// Plays the human seat headlessly. It sees only what any observer sees: its own
/// cards, hand sizes, books and the last public request.
pub struct Autopilot {
    memory: OpponentMemory,
    policy: HeuristicPolicy,
    rng: StdRng,
    last_turn_seen: Option<u32>,
    books_seen: BTreeMap<Seat, usize>,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            memory: OpponentMemory::new(Seat::HUMAN),
            policy: HeuristicPolicy::strict(),
            rng: StdRng::seed_from_u64(seed),
            last_turn_seen: None,
            books_seen: BTreeMap::new(),
        }
    }

    /// Folds public information from a view into memory. Safe to call with the
    /// same view repeatedly.
    pub fn observe(&mut self, view: &GameView) {
        if let Some(record) = view.last_request {
            if self.last_turn_seen.is_none_or(|turn| turn < record.turn) {
                self.last_turn_seen = Some(record.turn);
                self.memory
                    .note_request(record.asker, record.target, record.rank);
            }
        }

        for player in &view.players {
            let seen = self.books_seen.entry(player.seat).or_insert(0);
            for book in player.books.iter().skip(*seen) {
                self.memory.note_book(book.rank());
            }
            *seen = player.books.len();
        }
    }

    /// Picks a request for the human seat, or `None` when it has nothing to ask.
    pub fn choose(&mut self, view: &GameView) -> Option<Decision> {
        self.observe(view);
        let me = view.human()?;
        let hand = Hand::with_cards(me.visible_cards());
        let opponents: Vec<OpponentSummary> = view
            .players
            .iter()
            .filter(|p| p.seat != me.seat)
            .map(|p| OpponentSummary {
                seat: p.seat,
                hand_size: p.hand_size(),
            })
            .collect();

        let ctx = DecisionContext {
            seat: me.seat,
            hand: &hand,
            opponents: &opponents,
            memory: &self.memory,
        };
        let decision = self.policy.decide(&ctx, &mut self.rng)?;
        self.memory.note_own_ask(decision.rank);
        Some(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_core::game::GameState;
    use cricket_core::model::card::Card;
    use cricket_core::model::deck::Deck;
    use cricket_core::model::rank::Rank;
    use cricket_core::model::suit::Suit;

    fn state() -> GameState {
        let hands = [
            vec![
                Card::new(Rank::Four, Suit::Hearts),
                Card::new(Rank::Four, Suit::Clubs),
                Card::new(Rank::Jack, Suit::Spades),
            ],
            vec![Card::new(Rank::Four, Suit::Spades)],
            Vec::new(),
            vec![Card::new(Rank::Two, Suit::Clubs), Card::new(Rank::Nine, Suit::Clubs)],
        ];
        GameState::from_hands(["User", "CPU Alice", "CPU Bob", "CPU Charlie"], hands, Deck::empty())
    }

    #[test]
    fn chooses_from_its_own_visible_hand() {
        let mut state = state();
        let view = state.sanitize_for_observer();
        let mut autopilot = Autopilot::new(5);
        for _ in 0..20 {
            let decision = autopilot.choose(&view).expect("a move");
            assert_eq!(decision.rank, Rank::Four);
            assert_ne!(decision.target, Seat::North);
            assert_ne!(decision.target, Seat::South);
        }

        state.resolve_request(Seat::East, Rank::Four).expect("valid request");
        let view = state.sanitize_for_observer();
        autopilot.observe(&view);
        autopilot.observe(&view);
        assert!(autopilot.memory.has_failed(Seat::East, Rank::Four));
        assert_eq!(autopilot.last_turn_seen, Some(1));
    }

    #[test]
    fn observed_books_clear_beliefs() {
        let mut autopilot = Autopilot::new(1);
        autopilot
            .memory
            .note_request(Seat::West, Seat::East, Rank::Queen);
        assert_eq!(autopilot.memory.belief(Rank::Queen), 1);

        let hands = [
            vec![Card::new(Rank::Two, Suit::Hearts)],
            Suit::ALL.iter().map(|&s| Card::new(Rank::Queen, s)).collect(),
            vec![Card::new(Rank::Three, Suit::Hearts)],
            Vec::new(),
        ];
        let mut state =
            GameState::from_hands(["User", "CPU Alice", "CPU Bob", "CPU Charlie"], hands, Deck::empty());
        state.form_books(Seat::West);
        autopilot.observe(&state.sanitize_for_observer());

        assert_eq!(autopilot.memory.belief(Rank::Queen), 0);
        assert!(!autopilot.memory.has_failed(Seat::East, Rank::Queen));
        assert_eq!(autopilot.books_seen.get(&Seat::West), Some(&1));
    }
}
