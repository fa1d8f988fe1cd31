use crate::config::{PacingConfig, SessionConfig};
use crate::observer::{ObserverRegistry, SessionEvent, SessionObserver, SubscriptionId};
use crate::scheduler::{Due, Scheduler, TaskId};
use cricket_bot::{Difficulty, OpponentSummary, OpponentTable, Policy};
use cricket_core::game::{
    GamePhase, GameState, GameView, Message, MessageId, MessageKind, MessageLog, RequestOutcome,
};
use cricket_core::model::player::{Player, Seat};
use cricket_core::model::rank::Rank;
use cricket_core::{GameError, PLAYER_COUNT};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, event};

/// Deferred work, always applied to the state as it is when the task fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    FinishHumanTransfer,
    FinishDraw,
    ComputerMove(Seat),
    ComputerRequest { seat: Seat, target: Seat, rank: Rank },
    ExpireMessage(MessageId),
}

/// Owns the canonical game and drives it: human intents, computer turns, the
/// message log and the virtual clock. Observers only ever receive sanitized views.
pub struct GameSession {
    state: GameState,
    messages: MessageLog,
    opponents: OpponentTable,
    scheduler: Scheduler<Continuation>,
    observers: ObserverRegistry,
    pacing: PacingConfig,
    difficulties: [Option<Difficulty>; PLAYER_COUNT],
    rng: StdRng,
    generation: u64,
    pending_move: Option<TaskId>,
}

impl GameSession {
    /// An idle session in SETUP. Without a seed the deal is drawn from OS entropy.
    pub fn new(pacing: PacingConfig, seed: Option<u64>) -> Self {
        Self {
            state: GameState::new(),
            messages: MessageLog::new(),
            opponents: OpponentTable::new(),
            scheduler: Scheduler::new(),
            observers: ObserverRegistry::new(),
            pacing,
            difficulties: [None; PLAYER_COUNT],
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
            generation: 0,
            pending_move: None,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        let mut session = Self::new(config.pacing.clone(), config.seed);
        session.difficulties = config.difficulties();
        session
    }

    /// Takes over a game already in progress.
    pub fn with_state(state: GameState, pacing: PacingConfig, seed: u64) -> Self {
        let mut session = Self::new(pacing, Some(seed));
        session.generation = 1;
        session.state = state;
        session.seat_opponents();
        session.schedule_computer_move();
        session
    }

    /// Fixes a seat's difficulty for the next deal.
    pub fn set_difficulty(&mut self, seat: Seat, difficulty: Difficulty) {
        self.difficulties[seat.index()] = Some(difficulty);
    }

    /// Replaces a computer seat's policy, with a fresh memory.
    pub fn install_policy(&mut self, seat: Seat, policy: Box<dyn Policy>) {
        let difficulty = self.difficulty_for(seat);
        self.opponents.insert_policy(seat, difficulty, policy);
    }

    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) -> SubscriptionId {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn snapshot(&self) -> GameView {
        self.state.sanitize_for_observer()
    }

    pub fn messages(&self) -> &[Message] {
        self.messages.entries()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queued continuations, stale ones included.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// True when nothing will happen until the human asks for cards.
    pub fn awaiting_human(&self) -> bool {
        self.state.phase() == GamePhase::Playing
            && self.state.animation().is_none()
            && self.state.current_player().is_some_and(Player::is_human)
    }

    /// Deals a new game. Anything still scheduled for an earlier game is void.
    pub fn initialize_game<S: Into<String>>(&mut self, names: [S; PLAYER_COUNT]) {
        self.generation += 1;
        self.pending_move = None;
        if !self.messages.is_empty() {
            self.messages.clear();
            self.publish_messages();
        }

        self.state = GameState::deal(names, &mut self.rng);
        self.state.set_started_at(self.now_ms());
        self.seat_opponents();
        event!(
            target: "cricket_app::session",
            Level::INFO,
            generation = self.generation,
            deck = self.state.deck().len(),
            "game initialized"
        );
        self.publish_state();

        for seat in Seat::LOOP {
            self.form_books(seat);
        }
        self.post(
            MessageKind::Info,
            "Game started! Ask other players for cards.",
            None,
        );
        self.schedule_computer_move();
    }

    /// Back to SETUP with an empty log and no opponent memories.
    pub fn reset_game(&mut self) {
        self.generation += 1;
        self.pending_move = None;
        self.state = GameState::new();
        self.state.set_started_at(self.now_ms());
        self.opponents.clear();
        self.messages.clear();
        event!(
            target: "cricket_app::session",
            Level::INFO,
            generation = self.generation,
            "game reset"
        );
        self.publish_state();
        self.publish_messages();
    }

    /// The human asks `target` for every card of `rank`. Ignored unless it is the
    /// human's turn with nothing in flight; asking for a rank not in hand only posts
    /// a warning.
    pub fn request_cards(&mut self, target: Seat, rank: Rank) {
        let Some(asker) = self.state.current_player() else {
            event!(target: "cricket_app::session", Level::DEBUG, "request without a game");
            return;
        };
        let (seat, is_human, holds_rank) =
            (asker.seat(), asker.is_human(), asker.hand().has_rank(rank));

        if self.state.phase() != GamePhase::Playing
            || !is_human
            || self.state.animation().is_some()
        {
            event!(
                target: "cricket_app::session",
                Level::DEBUG,
                asked = %target,
                rank = %rank,
                "human request ignored"
            );
            return;
        }

        if !holds_rank {
            self.post(
                MessageKind::Warning,
                "You can only ask for ranks you have in your hand!",
                Some(seat),
            );
            return;
        }

        if let Err(err) = self.resolve(seat, target, rank) {
            event!(
                target: "cricket_app::session",
                Level::WARN,
                error = %err,
                "human request rejected"
            );
        }
    }

    /// Runs the clock forward by `ms`, firing everything that comes due on the
    /// way, including work scheduled while firing.
    pub fn advance(&mut self, ms: u64) {
        let until = self.now_ms().saturating_add(ms);
        while let Some(due) = self.scheduler.pop_due(until) {
            self.fire(due);
        }
        self.scheduler.advance_to(until);
    }

    /// Jumps to the next queued task and fires it. False when the queue is empty.
    pub fn step(&mut self) -> bool {
        let Some(due_ms) = self.scheduler.next_due() else {
            return false;
        };
        match self.scheduler.pop_due(due_ms) {
            Some(due) => {
                self.fire(due);
                true
            }
            None => false,
        }
    }

    fn fire(&mut self, due: Due<Continuation>) {
        if due.generation != self.generation {
            event!(
                target: "cricket_app::session",
                Level::DEBUG,
                task = ?due.task,
                scheduled = due.generation,
                current = self.generation,
                "stale continuation dropped"
            );
            return;
        }

        event!(
            target: "cricket_app::session",
            Level::TRACE,
            task = ?due.task,
            at = due.due_ms,
            "continuation fired"
        );
        match due.task {
            Continuation::FinishHumanTransfer => self.finish_human_transfer(),
            Continuation::FinishDraw => self.finish_draw(),
            Continuation::ComputerMove(seat) => self.computer_move(seat),
            Continuation::ComputerRequest { seat, target, rank } => {
                self.computer_request(seat, target, rank)
            }
            Continuation::ExpireMessage(id) => {
                if self.messages.expire(id) {
                    self.publish_messages();
                }
            }
        }
    }

    fn resolve(&mut self, asker: Seat, target: Seat, rank: Rank) -> Result<(), GameError> {
        let outcome = self.state.resolve_request(target, rank)?;
        self.opponents.observe_request(asker, target, rank);

        let asker_name = self.name_of(asker);
        let target_name = self.name_of(target);
        let is_human = self.state.player(asker).is_some_and(Player::is_human);

        match outcome {
            RequestOutcome::Hit { cards } => {
                let count = cards.len();
                self.post(
                    MessageKind::Success,
                    format!("{asker_name} got {count} {rank}(s) from {target_name}!"),
                    Some(asker),
                );
                if is_human {
                    self.state.show_transfer(target, asker, rank, count);
                }
                self.publish_state();
                self.form_books(asker);

                if is_human {
                    self.schedule(
                        self.pacing.human_transfer_ms,
                        Continuation::FinishHumanTransfer,
                    );
                } else {
                    self.end_turn();
                }
            }
            RequestOutcome::GoCricket => {
                self.post(
                    MessageKind::Info,
                    format!("{target_name} says \"Go Cricket!\" to {asker_name}"),
                    Some(asker),
                );
                self.publish_state();

                let drawn = if is_human {
                    self.state.begin_draw(asker)
                } else {
                    self.state.draw_into_hand(asker)
                };
                match drawn {
                    Ok(_) => self.publish_state(),
                    Err(GameError::EmptyDeck) => {
                        event!(
                            target: "cricket_app::session",
                            Level::DEBUG,
                            seat = %asker,
                            "deck empty, nothing drawn"
                        );
                    }
                    Err(err) => return Err(err),
                }

                if self.state.animation().is_some() {
                    self.schedule(self.pacing.draw_animation_ms, Continuation::FinishDraw);
                } else {
                    self.form_books(asker);
                    self.end_turn();
                }
            }
        }
        Ok(())
    }

    fn finish_human_transfer(&mut self) {
        if !self.state.finish_transfer() {
            event!(target: "cricket_app::session", Level::DEBUG, "no transfer to finish");
            return;
        }
        self.publish_state();
        self.end_turn();
    }

    fn finish_draw(&mut self) {
        let Some((seat, _)) = self.state.finish_draw() else {
            event!(target: "cricket_app::session", Level::DEBUG, "no draw to finish");
            return;
        };
        self.publish_state();
        self.form_books(seat);
        self.end_turn();
    }

    fn computer_move(&mut self, seat: Seat) {
        self.pending_move = None;
        if !self.is_turn_of(seat) {
            event!(
                target: "cricket_app::session",
                Level::DEBUG,
                seat = %seat,
                "computer move no longer current"
            );
            return;
        }

        let opponents: Vec<OpponentSummary> = self
            .state
            .players()
            .iter()
            .filter(|p| p.seat() != seat && !p.hand().is_empty())
            .map(|p| OpponentSummary {
                seat: p.seat(),
                hand_size: p.hand().len(),
            })
            .collect();
        if opponents.is_empty() {
            self.end_turn();
            return;
        }

        let hand = self
            .state
            .player(seat)
            .map(|p| p.hand().clone())
            .unwrap_or_default();
        let Some(decision) = self
            .opponents
            .decide(seat, &hand, &opponents, &mut self.rng)
        else {
            let err = GameError::NoValidMove(seat);
            let difficulty = self.opponents.difficulty(seat).map(Difficulty::as_str);
            event!(
                target: "cricket_app::session",
                Level::DEBUG,
                error = %err,
                difficulty = ?difficulty,
                "computer passes"
            );
            self.end_turn();
            return;
        };

        let text = format!(
            "{} asks {} for {}s",
            self.name_of(seat),
            self.name_of(decision.target),
            decision.rank
        );
        self.post(MessageKind::Info, text, Some(seat));
        let id = self.schedule(
            self.pacing.cpu_request_delay_ms,
            Continuation::ComputerRequest {
                seat,
                target: decision.target,
                rank: decision.rank,
            },
        );
        self.pending_move = Some(id);
    }

    fn computer_request(&mut self, seat: Seat, target: Seat, rank: Rank) {
        self.pending_move = None;
        if !self.is_turn_of(seat) {
            return;
        }
        if let Err(err) = self.resolve(seat, target, rank) {
            event!(
                target: "cricket_app::session",
                Level::WARN,
                seat = %seat,
                error = %err,
                "computer request rejected"
            );
            self.end_turn();
        }
    }

    /// Extracts books one at a time; each one is published on its own.
    fn form_books(&mut self, seat: Seat) {
        while let Some(book) = self.state.form_book(seat) {
            self.opponents.observe_book(book.rank());
            self.publish_state();
            let text = format!("{} formed a book of {}s!", self.name_of(seat), book.rank());
            self.post(MessageKind::Success, text, Some(seat));
        }
    }

    fn end_turn(&mut self) {
        if self.state.advance_turn().is_some() {
            self.publish_state();
            self.schedule_computer_move();
        }
        self.check_win();
    }

    fn schedule_computer_move(&mut self) {
        if self.state.phase() != GamePhase::Playing {
            return;
        }
        let Some(player) = self.state.current_player() else {
            return;
        };
        if player.is_human() || player.hand().is_empty() {
            return;
        }
        let seat = player.seat();
        let id = self.schedule(
            self.pacing.cpu_turn_delay_ms,
            Continuation::ComputerMove(seat),
        );
        self.pending_move = Some(id);
    }

    fn check_win(&mut self) {
        let Some(result) = self.state.evaluate_win() else {
            return;
        };
        if let Some(id) = self.pending_move.take() {
            self.scheduler.cancel(id);
        }

        if result.is_tie() {
            let names = result
                .tied
                .iter()
                .map(|&seat| self.name_of(seat))
                .collect::<Vec<_>>()
                .join(", ");
            self.post(
                MessageKind::Info,
                format!("Tiebreaker! {names} have the same number of books."),
                None,
            );
        }
        self.publish_state();

        let winner = self.name_of(result.winner);
        event!(
            target: "cricket_app::session",
            Level::INFO,
            winner = %result.winner,
            books = result.books,
            tie = result.is_tie(),
            "game over"
        );
        self.post(
            MessageKind::Success,
            format!("Game Over! {winner} wins with {} books!", result.books),
            Some(result.winner),
        );
    }

    fn is_turn_of(&self, seat: Seat) -> bool {
        self.state.phase() == GamePhase::Playing
            && self.state.animation().is_none()
            && self.state.current_seat() == Some(seat)
    }

    fn seat_opponents(&mut self) {
        self.opponents.clear();
        let seats: Vec<Seat> = self
            .state
            .players()
            .iter()
            .filter(|p| !p.is_human())
            .map(Player::seat)
            .collect();
        for seat in seats {
            let difficulty = self.difficulty_for(seat);
            self.opponents.initialize(seat, difficulty);
        }
    }

    fn difficulty_for(&self, seat: Seat) -> Difficulty {
        self.difficulties[seat.index()].unwrap_or_else(|| {
            self.state
                .player(seat)
                .map_or_else(Difficulty::default, |p| Difficulty::from_name(p.name()))
        })
    }

    fn name_of(&self, seat: Seat) -> String {
        self.state
            .player(seat)
            .map_or_else(|| seat.to_string(), |p| p.name().to_string())
    }

    fn schedule(&mut self, delay_ms: u64, continuation: Continuation) -> TaskId {
        event!(
            target: "cricket_app::session",
            Level::TRACE,
            task = ?continuation,
            delay_ms,
            "scheduled"
        );
        self.scheduler
            .schedule(delay_ms, self.generation, continuation)
    }

    fn post(&mut self, kind: MessageKind, text: impl Into<String>, player: Option<Seat>) -> MessageId {
        let now = self.now_ms();
        let id = self.messages.push(kind, text, now, player);
        self.publish_messages();
        self.schedule(self.pacing.message_ttl_ms, Continuation::ExpireMessage(id));
        id
    }

    fn publish_state(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let view = self.snapshot();
        self.observers.publish(&SessionEvent::State(view));
    }

    fn publish_messages(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let entries = self.messages.entries().to_vec();
        self.observers.publish(&SessionEvent::Messages(entries));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_core::CARDS_PER_PLAYER;

    const NAMES: [&str; 4] = ["User", "CPU Alice", "CPU Bob", "CPU Charlie"];

    #[test]
    fn new_session_idles_in_setup() {
        let mut session = GameSession::new(PacingConfig::default(), Some(1));
        assert_eq!(session.phase(), GamePhase::Setup);
        assert!(!session.awaiting_human());
        assert!(!session.step());
        session.request_cards(Seat::West, Rank::Ace);
        assert!(session.messages().is_empty());
    }

    #[test]
    fn initialize_deals_and_waits_for_the_human() {
        let mut session = GameSession::new(PacingConfig::default(), Some(3));
        session.initialize_game(NAMES);

        let view = session.snapshot();
        assert_eq!(view.phase, GamePhase::Playing);
        assert_eq!(view.turn_count, 1);
        assert_eq!(view.current_player_index, 0);
        let dealt: usize = view
            .players
            .iter()
            .map(|p| p.hand_size() + 4 * p.score)
            .sum();
        assert_eq!(dealt, CARDS_PER_PLAYER * PLAYER_COUNT);
        assert!(session.awaiting_human());
        assert_eq!(
            session.messages().last().map(|m| m.text.as_str()),
            Some("Game started! Ask other players for cards.")
        );
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn configured_difficulty_overrides_the_name() {
        let mut session = GameSession::new(PacingConfig::default(), Some(3));
        session.set_difficulty(Seat::North, Difficulty::Hard);
        session.initialize_game(NAMES);
        assert_eq!(session.opponents.difficulty(Seat::North), Some(Difficulty::Hard));
        assert_eq!(session.opponents.difficulty(Seat::West), Some(Difficulty::Hard));
        assert_eq!(session.opponents.difficulty(Seat::East), Some(Difficulty::Easy));
        assert!(session.opponents.memory(Seat::South).is_none());
    }
}
