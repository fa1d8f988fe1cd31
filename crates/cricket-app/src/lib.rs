pub mod autopilot;
pub mod config;
pub mod logging;
pub mod observer;
pub mod scheduler;
pub mod session;

pub use autopilot::Autopilot;
pub use config::{ConfigError, LoggingConfig, PacingConfig, PlayerConfig, SessionConfig};
pub use observer::{SessionEvent, SessionObserver, SubscriptionId};
pub use session::GameSession;
