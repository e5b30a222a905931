//! Advisor - one-shot move selection for ringfork
//!
//! A short-lived process that:
//! 1. Reads a board snapshot from a file or stdin
//! 2. Runs the MCTS move selector once for the given player
//! 3. Prints the chosen move as `row col`
//!
//! The game driver that alternates turns and validates moves lives elsewhere;
//! this binary only answers "what would the engine play here?".

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use engine_core::{Board, FixedTimer, Move, Player};
use games_lines::LineRules;
use mcts::{MctsPlayer, SearchResult};
use tracing::info;

mod config;

use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn read_board(path: Option<&Path>) -> Result<Board> {
    let text = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read board from {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read board from stdin")?;
            text
        }
    };

    text.parse::<Board>().context("invalid board snapshot")
}

fn advise(
    config: &Config,
    board: &Board,
    player: Player,
    last_move: Option<Move>,
) -> Result<SearchResult> {
    let rules = LineRules::new(config.line_length);
    let mut engine = match config.seed() {
        Some(seed) => MctsPlayer::with_seed(rules, player, seed),
        None => MctsPlayer::new(rules, player),
    }
    .with_config(config.mcts_config()?)
    .with_time_divisor(config.time_divisor);

    let result = match config.remaining() {
        Some(remaining) => {
            let timer = FixedTimer::uniform(remaining);
            engine.get_move(board, last_move, &timer)?
        }
        None => engine.get_move_with_budget(board, last_move, config.budget())?,
    };

    Ok(result)
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(
        variant = %config.variant,
        line_length = config.line_length,
        "Advisor starting"
    );

    let board = read_board(config.board.as_deref())?;
    let player = config.player()?;
    let last_move = config.last_move()?;

    let result = advise(&config, &board, player, last_move)?;
    info!(
        mv = %result.mv,
        decision = ?result.decision,
        iterations = result.iterations,
        rollouts = result.rollouts,
        value = result.value,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "Move selected"
    );

    println!("{} {}", result.mv.row, result.mv.col);
    Ok(())
}
