use core::fmt;
use serde::{Deserialize, Serialize};

/// Card rank. Aces are low; the order only matters for display and hand sorting.
/// Serialized as its symbol, the same text used in card ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
#[repr(u8)]
pub enum Rank {
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
}

impl Rank {
    pub const ORDERED: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Rank::ORDERED
            .iter()
            .copied()
            .find(|rank| rank.symbol().eq_ignore_ascii_case(symbol.trim()))
    }

    /// Zero-based position in [`Rank::ORDERED`].
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl From<Rank> for &'static str {
    fn from(rank: Rank) -> Self {
        rank.symbol()
    }
}

impl TryFrom<String> for Rank {
    type Error = String;

    fn try_from(symbol: String) -> Result<Self, Self::Error> {
        Rank::from_symbol(&symbol).ok_or_else(|| format!("unknown rank `{symbol}`"))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Rank::Ten).unwrap(), "\"10\"");
        assert_eq!(serde_json::from_str::<Rank>("\"q\"").unwrap(), Rank::Queen);
        assert!(serde_json::from_str::<Rank>("\"14\"").is_err());
    }

    #[test]
    fn display_matches_symbols() {
        assert_eq!(Rank::Queen.to_string(), "Q");
        assert_eq!(Rank::Ten.to_string(), "10");
        assert_eq!(Rank::Ace.to_string(), "A");
    }

    #[test]
    fn symbol_lookup_is_case_insensitive() {
        assert_eq!(Rank::from_symbol("k"), Some(Rank::King));
        assert_eq!(Rank::from_symbol(" 10 "), Some(Rank::Ten));
        assert_eq!(Rank::from_symbol("1"), None);
    }

    #[test]
    fn index_follows_ordered_table() {
        for (i, rank) in Rank::ORDERED.iter().enumerate() {
            assert_eq!(rank.index(), i);
        }
    }
}
