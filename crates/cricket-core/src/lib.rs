#![deny(warnings)]
pub mod error;
pub mod game;
pub mod model;

pub use error::{GameError, InvalidAction};

/// Cards dealt to every seat when a game starts.
pub const CARDS_PER_PLAYER: usize = 7;
/// Number of seats at the table.
pub const PLAYER_COUNT: usize = 4;
/// Size of the standard deck.
pub const DECK_SIZE: usize = 52;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "gocricket"
    }

    pub const fn codename() -> &'static str {
        "Go Cricket"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
