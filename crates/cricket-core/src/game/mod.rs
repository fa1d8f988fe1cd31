pub mod message;
pub mod state;
pub mod view;

pub use message::{MESSAGE_TTL_MS, Message, MessageId, MessageKind, MessageLog};
pub use state::{
    Animation, GamePhase, GameResult, GameState, RequestOutcome, RequestRecord, RequestResult,
};
pub use view::{AnimationView, CardView, GameView, PlayerView};
