use cricket_bot::Difficulty;
use cricket_core::PLAYER_COUNT;
use cricket_core::game::MESSAGE_TTL_MS;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_NAMES: [&str; PLAYER_COUNT] = ["User", "CPU Alice", "CPU Bob", "CPU Charlie"];

/// Session configuration loaded from YAML. Every section has defaults.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_players")]
    pub players: Vec<PlayerConfig>,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            players: default_players(),
            pacing: PacingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SessionConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_players(&self.players)?;
        self.pacing.validate()?;
        self.logging.normalize();
        if self.logging.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.logging.tracing_level),
            });
        }
        Ok(())
    }

    /// Seat-ordered display names; the first one is the human.
    pub fn player_names(&self) -> [String; PLAYER_COUNT] {
        std::array::from_fn(|index| {
            self.players
                .get(index)
                .map(|player| player.name.clone())
                .unwrap_or_else(|| DEFAULT_NAMES[index].to_string())
        })
    }

    /// Explicit difficulty per seat, where one is configured.
    pub fn difficulties(&self) -> [Option<Difficulty>; PLAYER_COUNT] {
        std::array::from_fn(|index| {
            self.players
                .get(index)
                .and_then(|player| player.difficulty.as_deref())
                .and_then(|value| value.parse().ok())
        })
    }
}

fn default_players() -> Vec<PlayerConfig> {
    DEFAULT_NAMES
        .iter()
        .map(|name| PlayerConfig {
            name: name.to_string(),
            difficulty: None,
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerConfig {
    pub name: String,
    /// `easy`, `medium` or `hard`. Derived from the name when absent.
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// Delays on the session's virtual clock, in milliseconds.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PacingConfig {
    pub human_transfer_ms: u64,
    pub draw_animation_ms: u64,
    pub cpu_turn_delay_ms: u64,
    pub cpu_request_delay_ms: u64,
    pub message_ttl_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            human_transfer_ms: 1_500,
            draw_animation_ms: 1_500,
            cpu_turn_delay_ms: 1_500,
            cpu_request_delay_ms: 1_000,
            message_ttl_ms: MESSAGE_TTL_MS,
        }
    }
}

impl PacingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.message_ttl_ms == 0 {
            return Err(ValidationError::InvalidField {
                field: "pacing.message_ttl_ms".to_string(),
                message: "message lifetime must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration; plain text on stderr at `warn` unless told otherwise.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            tracing_level: default_tracing_level(),
            json: false,
            file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

fn validate_players(players: &[PlayerConfig]) -> Result<(), ValidationError> {
    if players.len() != PLAYER_COUNT {
        return Err(ValidationError::InvalidField {
            field: "players".to_string(),
            message: format!(
                "exactly {PLAYER_COUNT} players are required, found {}",
                players.len()
            ),
        });
    }

    let mut seen = HashSet::new();
    for (index, player) in players.iter().enumerate() {
        let name = player.name.trim();
        if name.is_empty() {
            return Err(ValidationError::InvalidField {
                field: format!("players[{index}].name"),
                message: "player name must not be empty".to_string(),
            });
        }

        if !seen.insert(name.to_string()) {
            return Err(ValidationError::InvalidField {
                field: "players".to_string(),
                message: format!("player name '{name}' used more than once"),
            });
        }

        if let Some(value) = player.difficulty.as_deref() {
            if let Err(message) = value.parse::<Difficulty>() {
                return Err(ValidationError::InvalidField {
                    field: format!("players[{index}].difficulty"),
                    message,
                });
            }
        }
    }

    Ok(())
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
