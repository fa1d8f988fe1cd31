use cricket_bot::{Difficulty, OpponentSummary, OpponentTable};
use cricket_core::game::{GamePhase, GameState, RequestOutcome};
use cricket_core::model::player::Seat;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn summaries(state: &GameState, seat: Seat) -> Vec<OpponentSummary> {
    state
        .players()
        .iter()
        .filter(|p| p.seat() != seat)
        .map(|p| OpponentSummary {
            seat: p.seat(),
            hand_size: p.hand().len(),
        })
        .collect()
}

/// Lets the table drive every seat until the game ends.
fn play_out(seed: u64, difficulty: Difficulty) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::deal(["P0", "P1", "P2", "P3"], &mut rng);
    let mut table = OpponentTable::new();
    for seat in Seat::LOOP {
        table.initialize(seat, difficulty);
        state.form_books(seat);
    }

    let mut turns = 0;
    while state.phase() == GamePhase::Playing {
        turns += 1;
        assert!(turns < 10_000, "seed {seed} never finished");

        let seat = state.current_seat().expect("current seat");
        let hand = state.player(seat).unwrap().hand().clone();
        let opponents = summaries(&state, seat);
        let Some(decision) = table.decide(seat, &hand, &opponents, &mut rng) else {
            state.advance_turn();
            state.evaluate_win();
            continue;
        };

        let outcome = state
            .resolve_request(decision.target, decision.rank)
            .unwrap_or_else(|err| panic!("seed {seed}: illegal decision {decision:?}: {err}"));
        table.observe_request(seat, decision.target, decision.rank);
        if outcome == RequestOutcome::GoCricket {
            let _ = state.draw_into_hand(seat);
        }
        for book in state.form_books(seat) {
            table.observe_book(book.rank());
        }
        state.advance_turn();
        state.evaluate_win();
        assert!(state.cards_are_consistent());
    }
    state
}

#[test]
fn every_difficulty_finishes_with_legal_requests() {
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        for seed in 0..20 {
            let state = play_out(seed, difficulty);
            let total_books: usize = state.players().iter().map(|p| p.score()).sum();
            assert!(state.winner().is_some());
            assert!(total_books <= 13);
        }
    }
}

#[test]
fn same_seed_replays_identically() {
    let first = play_out(7, Difficulty::Medium);
    let second = play_out(7, Difficulty::Medium);
    assert_eq!(first.winner(), second.winner());
    assert_eq!(first.turn_count(), second.turn_count());
}
