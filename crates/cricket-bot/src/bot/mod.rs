mod difficulty;
mod memory;
mod table;

pub use difficulty::Difficulty;
pub use memory::{OpponentMemory, RECENT_ASK_WINDOW};
pub use table::OpponentTable;
