use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::bail;
use clap::Parser;

use cricket_app::config::SessionConfig;
use cricket_app::logging::init_logging;
use cricket_app::{Autopilot, GameSession, SessionEvent};
use cricket_core::AppInfo;
use cricket_core::game::{GamePhase, MessageId};

/// Plays a full game of Go Cricket headlessly, with an autopilot in the human seat.
#[derive(Debug, Parser)]
#[command(
    name = "gocricket",
    author,
    version,
    about = "Headless Go Cricket game runner"
)]
struct Cli {
    /// Path to a YAML session configuration.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the RNG seed for the deal and computer decisions.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the human player's display name.
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Give up after this many scheduler steps and human requests.
    #[arg(long, value_name = "STEPS", default_value_t = 20_000)]
    max_steps: usize,

    /// Print the final sanitized state as JSON instead of the message feed.
    #[arg(long)]
    json: bool,

    /// Exit after validating the configuration (no game is played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if let Some(name) = cli.name {
        if let Some(human) = config.players.first_mut() {
            human.name = name;
        }
    }

    config.validate()?;

    if cli.validate_only {
        println!("configuration ok");
        return Ok(());
    }

    let _logging = init_logging(&config.logging)?;
    tracing::info!(
        app = AppInfo::name(),
        version = AppInfo::version(),
        seed = ?config.seed,
        "starting session"
    );

    let mut session = GameSession::from_config(&config);
    if !cli.json {
        let printed: Rc<Cell<Option<MessageId>>> = Rc::new(Cell::new(None));
        let last = Rc::clone(&printed);
        session.subscribe(move |event: &SessionEvent| {
            if let SessionEvent::Messages(messages) = event {
                for message in messages.iter().filter(|m| last.get() < Some(m.id)) {
                    println!("[{:>6} ms] {}", message.timestamp_ms, message.text);
                    last.set(Some(message.id));
                }
            }
        });
    }

    session.initialize_game(config.player_names());
    let mut autopilot = Autopilot::new(config.seed.unwrap_or_default() ^ 0x5eed);

    let mut steps = 0;
    while session.phase() == GamePhase::Playing {
        if steps >= cli.max_steps {
            bail!("game did not finish within {} steps", cli.max_steps);
        }
        steps += 1;

        let view = session.snapshot();
        autopilot.observe(&view);
        if session.awaiting_human() {
            match autopilot.choose(&view) {
                Some(decision) => session.request_cards(decision.target, decision.rank),
                None => bail!("autopilot found no request to make"),
            }
        } else if !session.step() {
            bail!("session stalled with nothing scheduled");
        }
    }

    let view = session.snapshot();
    if cli.json {
        println!("{}", view.to_json()?);
        return Ok(());
    }

    println!();
    println!("Final standings after {} turns:", view.turn_count);
    for player in &view.players {
        let marker = if view.winner == Some(player.seat) { " *" } else { "" };
        println!("  {:<16} {:>2} books{marker}", player.name, player.score);
    }
    Ok(())
}
