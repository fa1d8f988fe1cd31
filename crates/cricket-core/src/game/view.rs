use super::state::{Animation, GamePhase, GameState, RequestRecord};
use crate::model::book::Book;
use crate::model::card::Card;
use crate::model::player::{Player, Seat};
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};

/// A card as an observer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "face", rename_all = "snake_case")]
pub enum CardView {
    Visible { card: Card },
    /// Opaque placeholder; carries no suit or rank.
    Hidden { token: String },
}

impl CardView {
    pub fn card(&self) -> Option<Card> {
        match self {
            CardView::Visible { card } => Some(*card),
            CardView::Hidden { .. } => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, CardView::Hidden { .. })
    }

    fn hide(self, owner: Seat, index: usize) -> Self {
        match self {
            CardView::Visible { .. } => CardView::Hidden {
                token: format!("hidden-{}-{}", owner.id(), index),
            },
            hidden => hidden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub seat: Seat,
    pub id: String,
    pub name: String,
    pub is_human: bool,
    pub is_current: bool,
    pub hand: Vec<CardView>,
    pub books: Vec<Book>,
    pub score: usize,
}

impl PlayerView {
    fn reveal(player: &Player, is_current: bool) -> Self {
        Self {
            seat: player.seat(),
            id: player.id(),
            name: player.name().to_string(),
            is_human: player.is_human(),
            is_current,
            hand: player
                .hand()
                .iter()
                .map(|&card| CardView::Visible { card })
                .collect(),
            books: player.books().to_vec(),
            score: player.score(),
        }
    }

    /// Cards this observer can actually read.
    pub fn visible_cards(&self) -> Vec<Card> {
        self.hand.iter().filter_map(CardView::card).collect()
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationView {
    DeckDraw {
        seat: Seat,
        card: CardView,
    },
    CardTransfer {
        from: Seat,
        to: Seat,
        rank: Rank,
        count: usize,
    },
}

/// Read-only projection of a [`GameState`] handed to everything outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub players: Vec<PlayerView>,
    pub current_player_index: usize,
    pub deck_size: usize,
    pub phase: GamePhase,
    pub winner: Option<Seat>,
    pub last_request: Option<RequestRecord>,
    pub turn_count: u32,
    pub animation: Option<AnimationView>,
    pub started_at_ms: u64,
}

impl GameView {
    /// Sanitized projection: only the human seat's cards stay readable.
    pub fn capture(state: &GameState) -> Self {
        Self::reveal(state).sanitized()
    }

    fn reveal(state: &GameState) -> Self {
        let current = state.current_index();
        let players = state
            .players()
            .iter()
            .enumerate()
            .map(|(index, player)| PlayerView::reveal(player, index == current))
            .collect();

        let animation = state.animation().map(|animation| match animation {
            Animation::DeckDraw { seat, card } => AnimationView::DeckDraw {
                seat: *seat,
                card: CardView::Visible { card: *card },
            },
            Animation::CardTransfer {
                from,
                to,
                rank,
                count,
            } => AnimationView::CardTransfer {
                from: *from,
                to: *to,
                rank: *rank,
                count: *count,
            },
        });

        Self {
            players,
            current_player_index: current,
            deck_size: state.deck().len(),
            phase: state.phase(),
            winner: state.winner(),
            last_request: state.last_request().copied(),
            turn_count: state.turn_count(),
            animation,
            started_at_ms: state.started_at_ms(),
        }
    }

    /// Replaces every non-human card with a placeholder, keeping hand length and
    /// order. Already hidden cards are left as they are.
    pub fn sanitized(mut self) -> Self {
        for player in self.players.iter_mut().filter(|p| !p.is_human) {
            let seat = player.seat;
            player.hand = std::mem::take(&mut player.hand)
                .into_iter()
                .enumerate()
                .map(|(index, card)| card.hide(seat, index))
                .collect();
        }

        let human_seats: Vec<Seat> = self
            .players
            .iter()
            .filter(|p| p.is_human)
            .map(|p| p.seat)
            .collect();
        if let Some(AnimationView::DeckDraw { seat, card }) = self.animation.as_mut() {
            if !human_seats.contains(seat) {
                let hidden = card.clone().hide(*seat, 0);
                *card = hidden;
            }
        }
        self
    }

    pub fn player(&self, seat: Seat) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.seat == seat)
    }

    pub fn current_player(&self) -> Option<&PlayerView> {
        self.players.get(self.current_player_index)
    }

    pub fn human(&self) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.is_human)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl GameState {
    /// The only form in which state leaves the engine.
    pub fn sanitize_for_observer(&self) -> GameView {
        GameView::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dealt() -> GameState {
        let mut rng = StdRng::seed_from_u64(5);
        GameState::deal(["User", "CPU Alice", "CPU Bob", "CPU Charlie"], &mut rng)
    }

    #[test]
    fn opponent_hands_are_hidden_and_sized() {
        let state = dealt();
        let view = state.sanitize_for_observer();

        for (player, seen) in state.players().iter().zip(&view.players) {
            assert_eq!(seen.hand.len(), player.hand().len());
            if player.is_human() {
                assert_eq!(seen.visible_cards(), player.hand().cards());
            } else {
                assert!(seen.hand.iter().all(CardView::is_hidden));
                assert_eq!(
                    seen.hand[0],
                    CardView::Hidden {
                        token: format!("hidden-{}-0", player.id())
                    }
                );
            }
        }
        assert_eq!(view.deck_size, state.deck().len());
        assert!(view.players[0].is_current);
        assert_eq!(view.players.iter().filter(|p| p.is_current).count(), 1);
    }

    #[test]
    fn sanitizing_twice_changes_nothing() {
        let view = dealt().sanitize_for_observer();
        assert_eq!(view.clone().sanitized(), view);
    }

    #[test]
    fn json_only_carries_human_cards() {
        let state = dealt();
        let json = state.sanitize_for_observer().to_json().unwrap();
        let human = state.player(Seat::South).unwrap().hand().len();
        assert_eq!(json.matches("\"face\": \"visible\"").count(), human);
        assert_eq!(json.matches("\"face\": \"hidden\"").count(), 21);

        let back = GameView::from_json(&json).unwrap();
        assert_eq!(back, state.sanitize_for_observer());
    }

    #[test]
    fn human_draw_in_flight_stays_visible() {
        let mut state = dealt();
        let card = state.begin_draw(Seat::South).unwrap();
        let view = state.sanitize_for_observer();
        assert_eq!(
            view.animation,
            Some(AnimationView::DeckDraw {
                seat: Seat::South,
                card: CardView::Visible { card }
            })
        );
    }
}
