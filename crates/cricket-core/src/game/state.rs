use crate::error::{GameError, InvalidAction};
use crate::model::book::Book;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::player::{Player, Seat};
use crate::model::rank::Rank;
use crate::{CARDS_PER_PLAYER, DECK_SIZE, PLAYER_COUNT};
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Setup,
    Playing,
    Finished,
}

/// Transient descriptor for something the presentation layer is still showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Animation {
    /// A card has left the deck but has not reached `seat`'s hand yet.
    DeckDraw { seat: Seat, card: Card },
    CardTransfer {
        from: Seat,
        to: Seat,
        rank: Rank,
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestResult {
    Hit { count: usize },
    GoCricket,
}

/// Public record of the most recent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub asker: Seat,
    pub target: Seat,
    pub rank: Rank,
    pub result: RequestResult,
    /// Turn on which the request was made.
    pub turn: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Every card of the rank moved from the target to the asker.
    Hit { cards: Vec<Card> },
    GoCricket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Seat,
    pub books: usize,
    /// Seats sharing the top book count; empty when the winner is outright.
    pub tied: Vec<Seat>,
}

impl GameResult {
    pub fn is_tie(&self) -> bool {
        !self.tied.is_empty()
    }
}

/// Canonical game state. Exactly one copy exists per session; observers only ever
/// see [`crate::game::GameView`] projections of it.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    players: Vec<Player>,
    current: usize,
    deck: Deck,
    phase: GamePhase,
    winner: Option<Seat>,
    last_request: Option<RequestRecord>,
    turn_count: u32,
    animation: Option<Animation>,
    started_at_ms: u64,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shuffles a fresh deck and deals [`CARDS_PER_PLAYER`] cards to each seat in turn.
    /// Initial books are left in hand; see [`GameState::form_books`].
    pub fn deal<R, S>(names: [S; PLAYER_COUNT], rng: &mut R) -> Self
    where
        R: rand::Rng + ?Sized,
        S: Into<String>,
    {
        let mut deck = Deck::shuffled(rng);
        let hands: [Vec<Card>; PLAYER_COUNT] =
            std::array::from_fn(|_| deck.deal(CARDS_PER_PLAYER));
        Self::from_hands(names, hands, deck)
    }

    /// Starts play from explicit hands and draw pile. South leads.
    pub fn from_hands<S: Into<String>>(
        names: [S; PLAYER_COUNT],
        hands: [Vec<Card>; PLAYER_COUNT],
        deck: Deck,
    ) -> Self {
        let players = names
            .into_iter()
            .zip(hands)
            .zip(Seat::LOOP)
            .map(|((name, cards), seat)| Player::new(seat, name, Hand::with_cards(cards)))
            .collect();

        Self {
            players,
            current: 0,
            deck,
            phase: GamePhase::Playing,
            winner: None,
            last_request: None,
            turn_count: 1,
            animation: None,
            started_at_ms: 0,
        }
    }

    pub fn set_started_at(&mut self, millis: u64) {
        self.started_at_ms = millis;
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat.index())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_seat(&self) -> Option<Seat> {
        self.players.get(self.current).map(Player::seat)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn last_request(&self) -> Option<&RequestRecord> {
        self.last_request.as_ref()
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Seats that still hold at least one card.
    pub fn seats_with_cards(&self) -> Vec<Seat> {
        self.players
            .iter()
            .filter(|player| !player.hand().is_empty())
            .map(Player::seat)
            .collect()
    }

    /// Cards accounted for across hands, books, deck and any card in flight.
    pub fn card_total(&self) -> usize {
        let held: usize = self.players.iter().map(|p| p.hand().len()).sum();
        let booked: usize = self.players.iter().map(|p| p.books().len() * 4).sum();
        let in_flight = usize::from(matches!(self.animation, Some(Animation::DeckDraw { .. })));
        held + booked + self.deck.len() + in_flight
    }

    /// True when every card identity is accounted for exactly once.
    pub fn cards_are_consistent(&self) -> bool {
        let mut seen = [false; DECK_SIZE];
        let mut mark = |card: &Card| !std::mem::replace(&mut seen[card.ordinal()], true);

        let hands_ok = self
            .players
            .iter()
            .all(|p| p.hand().iter().all(&mut mark));
        let books_ok = self
            .players
            .iter()
            .flat_map(Player::books)
            .all(|book| book.cards().iter().all(&mut mark));
        let deck_ok = self.deck.cards().iter().all(&mut mark);
        let flight_ok = match &self.animation {
            Some(Animation::DeckDraw { card, .. }) => mark(card),
            _ => true,
        };
        hands_ok && books_ok && deck_ok && flight_ok && self.card_total() == DECK_SIZE
    }

    /// Checks that the current player may ask `target` for `rank` right now.
    pub fn validate_request(&self, target: Seat, rank: Rank) -> Result<Seat, GameError> {
        if self.phase != GamePhase::Playing {
            return Err(InvalidAction::WrongPhase.into());
        }
        if self.animation.is_some() {
            return Err(InvalidAction::AnimationPending.into());
        }
        let asker = self
            .current_player()
            .ok_or(InvalidAction::WrongPhase)?;
        if self.player(target).is_none() {
            return Err(InvalidAction::UnknownSeat(target).into());
        }
        if target == asker.seat() {
            return Err(InvalidAction::SelfTarget(target).into());
        }
        if !asker.hand().has_rank(rank) {
            return Err(InvalidAction::RankNotHeld {
                seat: asker.seat(),
                rank,
            }
            .into());
        }
        Ok(asker.seat())
    }

    /// Resolves a request by the current player. On a hit every matching card moves to
    /// the asker at once; on a miss nothing moves and the caller handles the draw.
    pub fn resolve_request(
        &mut self,
        target: Seat,
        rank: Rank,
    ) -> Result<RequestOutcome, GameError> {
        let asker = self.validate_request(target, rank)?;
        let taken = self.players[target.index()].hand_mut().take_rank(rank);

        let (outcome, result) = if taken.is_empty() {
            (RequestOutcome::GoCricket, RequestResult::GoCricket)
        } else {
            let count = taken.len();
            self.players[asker.index()]
                .hand_mut()
                .extend(taken.iter().copied());
            (RequestOutcome::Hit { cards: taken }, RequestResult::Hit { count })
        };

        self.last_request = Some(RequestRecord {
            asker,
            target,
            rank,
            result,
            turn: self.turn_count,
        });
        event!(
            target: "cricket_core::game",
            Level::DEBUG,
            asker = %asker,
            asked = %target,
            rank = %rank,
            result = ?result,
            "request resolved"
        );
        Ok(outcome)
    }

    /// Draws the front card straight into `seat`'s hand.
    pub fn draw_into_hand(&mut self, seat: Seat) -> Result<Card, GameError> {
        if self.player(seat).is_none() {
            return Err(InvalidAction::UnknownSeat(seat).into());
        }
        let card = self.deck.draw()?;
        self.players[seat.index()].hand_mut().add(card);
        Ok(card)
    }

    /// Takes the front card off the deck and holds it in flight towards `seat`.
    pub fn begin_draw(&mut self, seat: Seat) -> Result<Card, GameError> {
        if self.animation.is_some() {
            return Err(InvalidAction::AnimationPending.into());
        }
        if self.player(seat).is_none() {
            return Err(InvalidAction::UnknownSeat(seat).into());
        }
        let card = self.deck.draw()?;
        self.animation = Some(Animation::DeckDraw { seat, card });
        Ok(card)
    }

    /// Lands an in-flight draw in its recipient's hand.
    pub fn finish_draw(&mut self) -> Option<(Seat, Card)> {
        match self.animation.take() {
            Some(Animation::DeckDraw { seat, card }) => {
                self.players[seat.index()].hand_mut().add(card);
                Some((seat, card))
            }
            other => {
                self.animation = other;
                None
            }
        }
    }

    pub fn show_transfer(&mut self, from: Seat, to: Seat, rank: Rank, count: usize) {
        if self.animation.is_none() {
            self.animation = Some(Animation::CardTransfer {
                from,
                to,
                rank,
                count,
            });
        }
    }

    /// Clears a transfer descriptor. In-flight draws are left alone.
    pub fn finish_transfer(&mut self) -> bool {
        if matches!(self.animation, Some(Animation::CardTransfer { .. })) {
            self.animation = None;
            true
        } else {
            false
        }
    }

    /// Extracts the lowest complete rank from `seat`'s hand as a new book.
    pub fn form_book(&mut self, seat: Seat) -> Option<Book> {
        let player = self.players.get_mut(seat.index())?;
        let counts = player.hand().rank_counts();
        let rank = Rank::ORDERED
            .into_iter()
            .find(|rank| counts[rank.index()] == 4)?;

        let cards = player.hand_mut().take_rank(rank);
        let Some(book) = Book::try_new(seat, &cards) else {
            player.hand_mut().extend(cards);
            return None;
        };
        player.push_book(book.clone());
        event!(
            target: "cricket_core::game",
            Level::DEBUG,
            seat = %seat,
            rank = %rank,
            score = player.score(),
            "book formed"
        );
        Some(book)
    }

    /// Extracts every complete rank, in rank order, so several books can form in
    /// one pass.
    pub fn form_books(&mut self, seat: Seat) -> Vec<Book> {
        std::iter::from_fn(|| self.form_book(seat)).collect()
    }

    /// Passes the turn clockwise. Seats with empty hands are passed over while anyone
    /// else still holds cards. Returns the new current seat.
    pub fn advance_turn(&mut self) -> Option<Seat> {
        let count = self.players.len();
        if count == 0 {
            return None;
        }

        let anyone_holds = self.players.iter().any(|p| !p.hand().is_empty());
        let mut next = (self.current + 1) % count;
        for _ in 1..count {
            if !anyone_holds || !self.players[next].hand().is_empty() {
                break;
            }
            next = (next + 1) % count;
        }

        self.current = next;
        self.turn_count += 1;
        let seat = self.players[next].seat();
        event!(
            target: "cricket_core::game",
            Level::DEBUG,
            seat = %seat,
            turn = self.turn_count,
            "turn advanced"
        );
        Some(seat)
    }

    /// Ends the game once at most one player holds cards.
    ///
    /// The nominal winner comes from a left-to-right reduction that keeps the earlier
    /// player only on a strictly greater book count, so the last tied seat wins a tie.
    pub fn evaluate_win(&mut self) -> Option<GameResult> {
        if self.phase != GamePhase::Playing || self.seats_with_cards().len() > 1 {
            return None;
        }

        let top = self.players.iter().map(Player::score).max()?;
        let tied: Vec<Seat> = self
            .players
            .iter()
            .filter(|p| p.score() == top)
            .map(Player::seat)
            .collect();
        let winner = self
            .players
            .iter()
            .reduce(|prev, current| {
                if prev.score() > current.score() {
                    prev
                } else {
                    current
                }
            })?
            .seat();

        self.phase = GamePhase::Finished;
        self.winner = Some(winner);
        event!(
            target: "cricket_core::game",
            Level::DEBUG,
            winner = %winner,
            books = top,
            tied = tied.len(),
            "game finished"
        );

        Some(GameResult {
            winner,
            books: top,
            tied: if tied.len() > 1 { tied } else { Vec::new() },
        })
    }
}
