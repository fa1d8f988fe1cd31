use crate::model::player::Seat;
use crate::model::rank::Rank;
use thiserror::Error;

/// Failures raised by rule transitions. None of them are fatal to a game: callers
/// absorb them and the state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the deck is empty")]
    EmptyDeck,
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    #[error("{0} has no valid move")]
    NoValidMove(Seat),
}

/// Reasons a card request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("the game is not in progress")]
    WrongPhase,
    #[error("{0} is not the current player")]
    NotYourTurn(Seat),
    #[error("a transfer or draw is still being shown")]
    AnimationPending,
    #[error("no player sits at {0}")]
    UnknownSeat(Seat),
    #[error("{0} cannot ask themselves")]
    SelfTarget(Seat),
    #[error("{seat} holds no {rank}")]
    RankNotHeld { seat: Seat, rank: Rank },
}
