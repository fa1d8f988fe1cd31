use crate::model::book::Book;
use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Fixed table positions. South is always the human seat; turns run clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    South = 0,
    West = 1,
    North = 2,
    East = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::South, Seat::West, Seat::North, Seat::East];

    pub const HUMAN: Seat = Seat::South;

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::South),
            1 => Some(Seat::West),
            2 => Some(Seat::North),
            3 => Some(Seat::East),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> Seat {
        match self {
            Seat::South => Seat::West,
            Seat::West => Seat::North,
            Seat::North => Seat::East,
            Seat::East => Seat::South,
        }
    }

    /// Player id exposed to observers, e.g. `player-2`.
    pub fn id(self) -> String {
        format!("player-{}", self.index())
    }

    pub fn from_id(id: &str) -> Option<Self> {
        id.strip_prefix("player-")
            .and_then(|raw| raw.parse::<usize>().ok())
            .and_then(Self::from_index)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::South => "South",
            Seat::West => "West",
            Seat::North => "North",
            Seat::East => "East",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Human,
    Computer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    seat: Seat,
    name: String,
    controller: Controller,
    hand: Hand,
    books: Vec<Book>,
}

impl Player {
    pub fn new(seat: Seat, name: impl Into<String>, hand: Hand) -> Self {
        let controller = if seat == Seat::HUMAN {
            Controller::Human
        } else {
            Controller::Computer
        };
        Self {
            seat,
            name: name.into(),
            controller,
            hand,
            books: Vec::new(),
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn id(&self) -> String {
        self.seat.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn is_human(&self) -> bool {
        matches!(self.controller, Controller::Human)
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn push_book(&mut self, book: Book) {
        self.books.push(book);
    }

    /// One point per book.
    pub fn score(&self) -> usize {
        self.books.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Controller, Player, Seat};
    use crate::model::hand::Hand;

    #[test]
    fn next_wraps_around() {
        assert_eq!(Seat::East.next(), Seat::South);
    }

    #[test]
    fn index_roundtrip() {
        for (i, seat) in Seat::LOOP.iter().enumerate() {
            assert_eq!(Seat::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
        }
    }

    #[test]
    fn ids_roundtrip() {
        assert_eq!(Seat::North.id(), "player-2");
        assert_eq!(Seat::from_id("player-3"), Some(Seat::East));
        assert_eq!(Seat::from_id("player-4"), None);
        assert_eq!(Seat::from_id("cpu-1"), None);
    }

    #[test]
    fn only_south_is_human() {
        for seat in Seat::LOOP {
            let player = Player::new(seat, "x", Hand::new());
            assert_eq!(player.is_human(), seat == Seat::South);
            if seat != Seat::South {
                assert_eq!(player.controller(), Controller::Computer);
            }
            assert_eq!(player.score(), 0);
        }
    }
}
