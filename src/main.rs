//! Terminal runner (default binary).
//!
//! Usage: `tetrion [--config <FILE>] [--seed <N>]` (see `--help`)
//!
//! The config file holds a (possibly partial) `GameConfig` in JSON; missing
//! fields take their defaults. Logging goes to stderr through `env_logger`
//! and stays silent unless `RUST_LOG` is set.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};

use tetrion::core::{GameConfig, GameSession};
use tetrion::input::{should_quit, InputHandler};
use tetrion::term::{GameView, TerminalRenderer};
use tetrion::types::TICK_MS;

/// Falling-block game in the terminal
#[derive(Parser, Debug)]
#[command(name = "tetrion", version)]
struct Args {
    /// JSON file holding a (possibly partial) game configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for piece selection; defaults to the clock
    #[arg(long)]
    seed: Option<u32>,
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(1)
    });
    let session = GameSession::new(config, seed).context("invalid game configuration")?;
    log::info!("starting with seed {}", seed);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, mut session: GameSession) -> Result<()> {
    let mut view = GameView::new();
    let mut input_handler = InputHandler::new();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));

    loop {
        for event in session.drain_events() {
            view.apply(&event);
        }
        term.draw(view.render(&session))?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        input_handler.handle_key_press(key.code);
                    }
                    KeyEventKind::Release => {
                        input_handler.handle_key_release(key.code);
                    }
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            let intents = input_handler.update(TICK_MS);
            session.tick(TICK_MS, &intents);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{error::ErrorKind, CommandFactory};

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parses_config_and_seed() {
        let args = Args::try_parse_from(["tetrion", "--config", "game.json", "--seed", "7"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("game.json")));
        assert_eq!(args.seed, Some(7));

        let args = Args::try_parse_from(["tetrion"]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let err = Args::try_parse_from(["tetrion", "--seed", "abc"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Args::try_parse_from(["tetrion", "--speed", "3"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = Args::try_parse_from(["tetrion", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
