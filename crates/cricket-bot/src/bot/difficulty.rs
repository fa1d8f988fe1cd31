use std::str::FromStr;

/// How often a computer opponent sticks to its heuristic instead of asking at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn optimal_play_rate(self) -> f64 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 0.9,
        }
    }

    /// Placeholder personality keyed off the display name, used when no explicit
    /// difficulty is configured.
    pub fn from_name(name: &str) -> Self {
        if name.contains("Alice") {
            Difficulty::Hard
        } else if name.contains("Bob") {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "normal" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{other}'; expected easy, medium or hard"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Difficulty;

    #[test]
    fn name_placeholder_matches_substrings() {
        assert_eq!(Difficulty::from_name("CPU Alice"), Difficulty::Hard);
        assert_eq!(Difficulty::from_name("CPU Bob"), Difficulty::Medium);
        assert_eq!(Difficulty::from_name("CPU Charlie"), Difficulty::Easy);
        assert_eq!(Difficulty::from_name("alice"), Difficulty::Easy);
    }

    #[test]
    fn rates_increase_with_difficulty() {
        assert!(Difficulty::Easy.optimal_play_rate() < Difficulty::Medium.optimal_play_rate());
        assert!(Difficulty::Medium.optimal_play_rate() < Difficulty::Hard.optimal_play_rate());
    }

    #[test]
    fn parses_labels() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("normal".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert!("expert".parse::<Difficulty>().is_err());
    }
}
